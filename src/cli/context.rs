//! cli::context
//!
//! Execution context shared by all command handlers.

use crate::api::{ApiError, HttpApi};
use crate::config::Config;
use crate::rules::RuleRegistry;
use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Built once in [`super::run`] from the loaded configuration and the global
/// flags. The rule registry lives here so every renderer receives the same
/// instance explicitly.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration (file and environment layers).
    pub config: Config,
    /// Rule metadata used to annotate rule codes.
    pub rules: RuleRegistry,
    /// `--backend-url`, which beats every configured value.
    pub backend_url: Option<String>,
    /// Output verbosity.
    pub verbosity: Verbosity,
    /// Interactive prompts allowed.
    pub interactive: bool,
    /// Emit JSON instead of text views.
    pub json: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            config: Config::default(),
            rules: RuleRegistry::builtin(),
            backend_url: None,
            verbosity: Verbosity::Normal,
            interactive: false,
            json: false,
        }
    }
}

impl Context {
    /// Effective backend origin.
    pub fn backend_url(&self) -> &str {
        self.backend_url
            .as_deref()
            .unwrap_or_else(|| self.config.backend_url())
    }

    /// Rows per page for paginated lists.
    pub fn page_size(&self) -> u32 {
        self.config.page_size()
    }

    /// Rows per page of a system's evaluation history.
    pub fn history_page_size(&self) -> u32 {
        self.config.history_page_size()
    }

    /// HTTP client configured for this context.
    pub fn api(&self) -> Result<HttpApi, ApiError> {
        tracing::debug!(backend = self.backend_url(), "creating api client");
        HttpApi::builder(self.backend_url())
            .maybe_token(self.config.internal_ui_token())
            .timeout(self.config.timeout())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BACKEND_URL;

    #[test]
    fn flag_beats_config() {
        let mut ctx = Context::default();
        assert_eq!(ctx.backend_url(), DEFAULT_BACKEND_URL);

        ctx.backend_url = Some("https://flag.example".into());
        assert_eq!(ctx.backend_url(), "https://flag.example");
        assert_eq!(
            ctx.api().unwrap().base_url(),
            "https://flag.example/api/internal"
        );
    }

    #[test]
    fn default_context_has_builtin_rules() {
        assert_eq!(Context::default().rules.len(), 12);
    }
}
