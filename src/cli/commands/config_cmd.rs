//! config command - Show effective configuration

use super::emit;
use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;
use serde::Serialize;

/// Effective settings and where each one came from.
#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    config_file: Option<String>,
    backend_url: &'a str,
    backend_url_source: &'static str,
    /// Whether a token is set; the token itself is never shown
    internal_ui_token: bool,
    internal_ui_token_source: Option<&'static str>,
    timeout_secs: u64,
    page_size: u32,
    history_page_size: u32,
}

fn effective(ctx: &Context) -> EffectiveConfig<'_> {
    let config = &ctx.config;

    let backend_url_source = if ctx.backend_url.is_some() {
        "flag"
    } else if config.env.backend_url.is_some() {
        "env"
    } else if config.file.backend_url.is_some() {
        "file"
    } else {
        "default"
    };

    let internal_ui_token_source = if config.env.internal_ui_token.is_some() {
        Some("env")
    } else if config.file.internal_ui_token.is_some() {
        Some("file")
    } else {
        None
    };

    EffectiveConfig {
        config_file: config.loaded_from().map(|p| p.display().to_string()),
        backend_url: ctx.backend_url(),
        backend_url_source,
        internal_ui_token: internal_ui_token_source.is_some(),
        internal_ui_token_source,
        timeout_secs: config.timeout().as_secs(),
        page_size: ctx.page_size(),
        history_page_size: ctx.history_page_size(),
    }
}

/// Show effective configuration.
pub fn show(ctx: &Context) -> Result<()> {
    emit(ctx, show_report(ctx)?);
    Ok(())
}

/// Render effective configuration.
pub fn show_report(ctx: &Context) -> Result<String> {
    let eff = effective(ctx);

    if ctx.json {
        return Ok(output::to_json(&eff)?);
    }

    let token = match eff.internal_ui_token_source {
        Some(source) => format!("set ({})", source),
        None => "not set".to_string(),
    };
    let lines = [
        format!(
            "config file        = {}",
            eff.config_file.as_deref().unwrap_or("(none)")
        ),
        format!(
            "backend_url        = {} ({})",
            eff.backend_url, eff.backend_url_source
        ),
        format!("internal_ui_token  = {}", token),
        format!("api.timeout_secs   = {}", eff.timeout_secs),
        format!("display.page_size  = {}", eff.page_size),
        format!("display.history_page_size = {}", eff.history_page_size),
    ];
    Ok(lines.join("\n"))
}

/// Print the path of the loaded config file.
pub fn path(ctx: &Context) -> Result<()> {
    match ctx.config.loaded_from() {
        Some(path) => println!("{}", path.display()),
        None => output::print("No config file found.", ctx.verbosity),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DEFAULT_BACKEND_URL};

    #[test]
    fn defaults_are_labelled() {
        let text = show_report(&Context::default()).unwrap();
        assert!(text.contains(&format!("backend_url        = {} (default)", DEFAULT_BACKEND_URL)));
        assert!(text.contains("internal_ui_token  = not set"));
        assert!(text.contains("config file        = (none)"));
        assert!(text.contains("display.history_page_size = 10"));
    }

    #[test]
    fn env_token_is_never_printed() {
        let mut config = Config::default();
        config.env.internal_ui_token = Some("s3cret".into());
        config.env.backend_url = Some("https://env.example".into());
        let ctx = Context {
            config,
            ..Default::default()
        };

        let text = show_report(&ctx).unwrap();
        assert!(text.contains("https://env.example (env)"));
        assert!(text.contains("set (env)"));
        assert!(!text.contains("s3cret"));

        let json = show_report(&Context { json: true, ..ctx }).unwrap();
        assert!(!json.contains("s3cret"));
    }

    #[test]
    fn flag_source() {
        let ctx = Context {
            backend_url: Some("https://flag.example".into()),
            ..Default::default()
        };
        let text = show_report(&ctx).unwrap();
        assert!(text.contains("https://flag.example (flag)"));
    }
}
