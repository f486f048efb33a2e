//! trace command - Governance trace events

use super::run_report;
use crate::api::GovernanceApi;
use crate::cli::Context;
use crate::ui::{output, render};
use anyhow::{Context as _, Result};

/// Show governance trace events.
pub fn trace(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    run_report(ctx, trace_report(ctx, &api))
}

/// Fetch and render governance trace events.
pub async fn trace_report(ctx: &Context, api: &dyn GovernanceApi) -> Result<String> {
    let events = api
        .governance_trace()
        .await
        .context("Failed to load governance trace")?;

    if ctx.json {
        return Ok(output::to_json(&events)?);
    }
    Ok(render::trace(&events))
}
