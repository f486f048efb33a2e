//! estate command - Estate-wide governance health

use super::run_report;
use crate::api::GovernanceApi;
use crate::cli::Context;
use crate::ui::{output, render};
use anyhow::{Context as _, Result};

/// Show the estate overview.
pub fn estate(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    run_report(ctx, estate_report(ctx, &api))
}

/// Fetch and render the estate overview.
pub async fn estate_report(ctx: &Context, api: &dyn GovernanceApi) -> Result<String> {
    let health = api
        .estate_health()
        .await
        .context("Failed to load estate health")?;

    if ctx.json {
        return Ok(output::to_json(&health)?);
    }
    Ok(render::estate(&health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{FailOn, MockApi};
    use crate::api::{ApiError, EstateHealth};

    fn health() -> EstateHealth {
        EstateHealth {
            total_systems: 10,
            active_systems: 9,
            inactive_systems: 1,
            systems_with_deny_last_30_days: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn renders_text() {
        let api = MockApi::new().with_estate(health());
        let text = estate_report(&Context::default(), &api).await.unwrap();
        assert!(text.contains("Estate Overview"));
        assert!(text.contains("9 (90%)"));
    }

    #[tokio::test]
    async fn renders_json() {
        let api = MockApi::new().with_estate(health());
        let ctx = Context {
            json: true,
            ..Default::default()
        };
        let text = estate_report(&ctx, &api).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_systems"], 10);
    }

    #[tokio::test]
    async fn error_carries_context() {
        let api = MockApi::new().fail_on(FailOn::EstateHealth(ApiError::Unauthorized(
            "bad token".into(),
        )));
        let err = estate_report(&Context::default(), &api).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load estate health");
        assert!(format!("{:#}", err).contains("not authorized: bad token"));
    }
}
