//! systems command - Browse systems and their governance posture
//!
//! # Example
//!
//! ```bash
//! # All systems
//! vidar systems list
//!
//! # Risk summary (default tab)
//! vidar systems show 12
//!
//! # Second page of evaluation history
//! vidar systems show 12 --tab evals --page 2
//! ```

use super::run_report;
use crate::api::{GovernanceApi, PageRequest};
use crate::cli::args::SystemTab;
use crate::cli::Context;
use crate::ui::{output, render};
use anyhow::{Context as _, Result};

/// List all systems.
pub fn list(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    run_report(ctx, list_report(ctx, &api))
}

/// Fetch and render the systems list.
pub async fn list_report(ctx: &Context, api: &dyn GovernanceApi) -> Result<String> {
    let systems = api.list_systems().await.context("Failed to load systems")?;

    if ctx.json {
        return Ok(output::to_json(&systems)?);
    }
    Ok(render::systems_list(&systems))
}

/// Show one tab of a system.
pub fn show(ctx: &Context, id: &str, tab: SystemTab, page: u32) -> Result<()> {
    let api = ctx.api()?;
    run_report(ctx, show_report(ctx, &api, id, tab, page))
}

/// Fetch and render one tab of a system.
///
/// `page` only applies to the evaluation history.
pub async fn show_report(
    ctx: &Context,
    api: &dyn GovernanceApi,
    id: &str,
    tab: SystemTab,
    page: u32,
) -> Result<String> {
    let failed = || format!("Failed to load system {}", id);

    let (title, body) = match tab {
        SystemTab::Risk => {
            let risk = api.risk_summary(id).await.with_context(failed)?;
            if ctx.json {
                return Ok(output::to_json(&risk)?);
            }
            ("Risk Summary", render::risk_summary(&risk, &ctx.rules))
        }
        SystemTab::Map => {
            let map = api.dependency_map(id).await.with_context(failed)?;
            if ctx.json {
                return Ok(output::to_json(&map)?);
            }
            ("Dependency Map", render::dependency_map(&map))
        }
        SystemTab::Evals => {
            let request = PageRequest::new(page, ctx.history_page_size());
            let events = api
                .evaluation_history(id, request)
                .await
                .with_context(failed)?;
            if ctx.json {
                return Ok(output::to_json(&events)?);
            }
            (
                "Evaluation History",
                render::evaluation_history(&events, request.page, &ctx.rules),
            )
        }
    };

    Ok(format!("System {} · {}\n\n{}", id, title, body))
}
