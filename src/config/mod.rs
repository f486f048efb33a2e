//! config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment (`VIDAR_BACKEND_URL`, `VIDAR_INTERNAL_UI_TOKEN`)
//! 4. CLI flags (not handled here)
//!
//! # Config File Locations
//!
//! Searched in order:
//! 1. `$VIDAR_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/vidar/config.toml`
//! 3. `~/.vidar/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use vidar::config::Config;
//!
//! let result = Config::load().unwrap();
//! let config = result.config;
//! println!("Backend: {}", config.backend_url());
//! println!("Page size: {}", config.page_size());
//! ```

pub mod schema;

pub use schema::{ApiSettings, DisplaySettings, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Backend used when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default rows per page of a system's evaluation history.
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 10;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "VIDAR_CONFIG";
/// Environment override for the backend URL.
pub const ENV_BACKEND_URL: &str = "VIDAR_BACKEND_URL";
/// Environment override for the internal UI token.
pub const ENV_INTERNAL_UI_TOKEN: &str = "VIDAR_INTERNAL_UI_TOKEN";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Values taken from the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    /// `VIDAR_BACKEND_URL`
    pub backend_url: Option<String>,
    /// `VIDAR_INTERNAL_UI_TOKEN`
    pub internal_ui_token: Option<String>,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence; callers never look at the raw layers.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed config file (defaults if none was found)
    pub file: FileConfig,
    /// Environment overrides
    pub env: EnvOverrides,
    /// Path the file was loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment and default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// any configured value is invalid. A missing file is not an error.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Load configuration using `lookup` for environment variables and
    /// `home` as the home directory.
    pub fn load_with<F>(lookup: F, home: Option<PathBuf>) -> Result<ConfigLoadResult, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = Self::locate(&lookup, home.as_deref());

        let file = match &path {
            Some(p) => {
                tracing::debug!(path = %p.display(), "loading config file");
                Self::read_file(p)?
            }
            None => {
                tracing::debug!("no config file found, using defaults");
                FileConfig::default()
            }
        };
        file.validate()?;

        let env = EnvOverrides {
            backend_url: lookup(ENV_BACKEND_URL).filter(|v| !v.is_empty()),
            internal_ui_token: lookup(ENV_INTERNAL_UI_TOKEN).filter(|v| !v.is_empty()),
        };
        if let Some(url) = &env.backend_url {
            schema::validate_backend_url(url)?;
        }
        if let Some(token) = &env.internal_ui_token {
            schema::validate_token(token)?;
        }

        Ok(ConfigLoadResult {
            config: Config { file, env, path },
        })
    }

    /// Find the first existing config file.
    fn locate<F>(lookup: &F, home: Option<&Path>) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 1. $VIDAR_CONFIG
        if let Some(path) = lookup(ENV_CONFIG) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/vidar/config.toml
        if let Some(xdg_home) = lookup("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("vidar/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.vidar/config.toml
        if let Some(home) = home {
            let path = home.join(".vidar/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Backend origin.
    ///
    /// Defaults to [`DEFAULT_BACKEND_URL`].
    pub fn backend_url(&self) -> &str {
        self.env
            .backend_url
            .as_deref()
            .or(self.file.backend_url.as_deref())
            .unwrap_or(DEFAULT_BACKEND_URL)
    }

    /// Token for the `X-Internal-UI` header, if any.
    pub fn internal_ui_token(&self) -> Option<&str> {
        self.env
            .internal_ui_token
            .as_deref()
            .or(self.file.internal_ui_token.as_deref())
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .file
            .api
            .as_ref()
            .and_then(|a| a.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Rows per page for paginated lists.
    pub fn page_size(&self) -> u32 {
        self.file
            .display
            .as_ref()
            .and_then(|d| d.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Rows per page of a system's evaluation history.
    pub fn history_page_size(&self) -> u32 {
        self.file
            .display
            .as_ref()
            .and_then(|d| d.history_page_size)
            .unwrap_or(DEFAULT_HISTORY_PAGE_SIZE)
    }

    /// Path the config file was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
