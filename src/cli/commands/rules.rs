//! rules command - Browse the rule metadata catalog
//!
//! Works entirely offline against the registry in the [`Context`].

use super::emit;
use crate::cli::Context;
use crate::ui::{output, render};
use anyhow::Result;

/// List every rule in catalog order.
pub fn list(ctx: &Context) -> Result<()> {
    emit(ctx, list_report(ctx)?);
    Ok(())
}

/// Render the catalog.
pub fn list_report(ctx: &Context) -> Result<String> {
    if ctx.json {
        return Ok(output::to_json(ctx.rules.list())?);
    }
    Ok(render::rules_catalog(&ctx.rules))
}

/// Show one rule.
///
/// An unknown code is reported, not treated as a failure.
pub fn show(ctx: &Context, code: &str) -> Result<()> {
    emit(ctx, show_report(ctx, code)?);
    Ok(())
}

/// Render one rule, or a notice when the code is not in the catalog.
pub fn show_report(ctx: &Context, code: &str) -> Result<String> {
    let rule = ctx.rules.get(code);

    if ctx.json {
        return Ok(output::to_json(&rule)?);
    }
    Ok(match rule {
        Some(rule) => render::rule_detail(rule),
        None => format!("Rule {} is not in the catalog.", code),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_known_rule() {
        let text = show_report(&Context::default(), "CINT-002").unwrap();
        assert!(text.starts_with("CINT-002"));
        assert!(text.contains("Canonical Governance Rules"));
    }

    #[test]
    fn show_unknown_rule_is_a_notice() {
        let text = show_report(&Context::default(), "XYZ-1").unwrap();
        assert_eq!(text, "Rule XYZ-1 is not in the catalog.");
    }

    #[test]
    fn unknown_rule_json_is_null() {
        let ctx = Context {
            json: true,
            ..Default::default()
        };
        assert_eq!(show_report(&ctx, "XYZ-1").unwrap(), "null");
    }

    #[test]
    fn list_json_preserves_order() {
        let ctx = Context {
            json: true,
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&list_report(&ctx).unwrap()).unwrap();
        let codes: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes.first(), Some(&"SOVR-001"));
        assert_eq!(codes.last(), Some(&"PROD-002"));
        assert_eq!(codes.len(), 12);
    }
}
