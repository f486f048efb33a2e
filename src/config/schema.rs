//! config::schema
//!
//! Configuration file schema.
//!
//! # Validation
//!
//! Values are validated after parsing: the backend URL must be an absolute
//! http(s) URL, the UI token must be a legal header value, and numeric
//! settings must be in range.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// User configuration file.
///
/// # Example
///
/// ```toml
/// backend_url = "https://dashboard.internal.example"
/// internal_ui_token = "runtime-token"
///
/// [api]
/// timeout_secs = 30
///
/// [display]
/// page_size = 20
/// history_page_size = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Backend origin; the client appends `/api/internal`.
    pub backend_url: Option<String>,

    /// Token sent as `X-Internal-UI` to the backend proxy.
    pub internal_ui_token: Option<String>,

    /// HTTP client settings
    pub api: Option<ApiSettings>,

    /// Rendering settings
    pub display: Option<DisplaySettings>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.backend_url {
            validate_backend_url(url)?;
        }

        if let Some(token) = &self.internal_ui_token {
            validate_token(token)?;
        }

        if let Some(api) = &self.api {
            if api.timeout_secs == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "api.timeout_secs must be greater than zero".to_string(),
                ));
            }
        }

        if let Some(display) = &self.display {
            let sizes = [
                ("display.page_size", display.page_size),
                ("display.history_page_size", display.history_page_size),
            ];
            for (key, size) in sizes {
                if let Some(size) = size {
                    if size == 0 || size > MAX_PAGE_SIZE {
                        return Err(ConfigError::InvalidValue(format!(
                            "{} must be between 1 and {}, got {}",
                            key, MAX_PAGE_SIZE, size
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Rows per page for paginated lists
    pub page_size: Option<u32>,

    /// Rows per page of a system's evaluation history
    pub history_page_size: Option<u32>,
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_backend_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidValue(format!("invalid backend_url '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "backend_url must use http or https, got '{}'",
            other
        ))),
    }
}

/// Check that `token` can travel in an HTTP header.
pub fn validate_token(token: &str) -> Result<(), ConfigError> {
    if token.is_empty() {
        return Err(ConfigError::InvalidValue(
            "internal_ui_token cannot be empty".to_string(),
        ));
    }
    if !token.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(ConfigError::InvalidValue(
            "internal_ui_token must be printable ASCII without spaces".to_string(),
        ));
    }
    Ok(())
}
