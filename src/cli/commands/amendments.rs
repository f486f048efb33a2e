//! cli::commands::amendments
//!
//! Review, simulate and transition amendments.
//!
//! # Design
//!
//! Transitions are confirmed before anything is sent:
//! - Interactive: the operator answers a y/N prompt
//! - Non-interactive: `--yes` is required, otherwise the command fails
//!
//! After a successful transition the amendment is fetched again and its new
//! state reported, so the output always reflects what the backend recorded.

use super::run_report;
use crate::api::{
    AmendmentAction, AmendmentQuery, AmendmentState, GovernanceApi, PageRequest,
    TransitionRequest,
};
use crate::cli::args::TransitionArgs;
use crate::cli::Context;
use crate::ui::prompts::{self, PromptError};
use crate::ui::{output, render};
use anyhow::{anyhow, Context as _, Result};

/// List amendments.
pub fn list(ctx: &Context, state: Option<AmendmentState>, page: u32) -> Result<()> {
    let api = ctx.api()?;
    run_report(ctx, list_report(ctx, &api, state, page))
}

/// Fetch and render one page of amendments.
pub async fn list_report(
    ctx: &Context,
    api: &dyn GovernanceApi,
    state: Option<AmendmentState>,
    page: u32,
) -> Result<String> {
    let query = AmendmentQuery {
        state,
        page: PageRequest::new(page, ctx.page_size()),
    };
    let amendments = api
        .list_amendments(query)
        .await
        .context("Failed to load amendments")?;

    if ctx.json {
        return Ok(output::to_json(&amendments)?);
    }
    Ok(render::amendments_list(&amendments, query.page.page))
}

/// Show one amendment.
pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let api = ctx.api()?;
    run_report(ctx, show_report(ctx, &api, id))
}

/// Fetch and render one amendment.
pub async fn show_report(ctx: &Context, api: &dyn GovernanceApi, id: &str) -> Result<String> {
    let detail = api
        .get_amendment(id)
        .await
        .with_context(|| format!("Failed to load amendment {}", id))?;

    if ctx.json {
        return Ok(output::to_json(&detail)?);
    }
    Ok(render::amendment_detail(&detail))
}

/// Run an impact simulation.
pub fn simulate(ctx: &Context, id: &str) -> Result<()> {
    let api = ctx.api()?;
    run_report(ctx, simulate_report(ctx, &api, id))
}

/// Simulate an amendment and render the predicted impact.
pub async fn simulate_report(ctx: &Context, api: &dyn GovernanceApi, id: &str) -> Result<String> {
    let result = api
        .simulate_amendment(id)
        .await
        .with_context(|| format!("Simulation failed for amendment {}", id))?;

    if ctx.json {
        return Ok(output::to_json(&result)?);
    }
    Ok(render::simulation(&result, &ctx.rules))
}

/// Approve, reject or execute an amendment.
pub fn transition(ctx: &Context, action: AmendmentAction, args: &TransitionArgs) -> Result<()> {
    let request = TransitionRequest::new(action, &args.actor, args.notes.as_deref())?;

    if !args.yes {
        let question = format!("{} amendment {}?", verb(action), args.id);
        let confirmed = prompts::confirm(&question, false, ctx.interactive).map_err(|e| match e {
            PromptError::NotInteractive => anyhow!(
                "Refusing to {} amendment {} without confirmation. Pass --yes to proceed.",
                action,
                args.id
            ),
            other => other.into(),
        })?;
        if !confirmed {
            output::print("Aborted.", ctx.verbosity);
            return Ok(());
        }
    }

    let api = ctx.api()?;
    run_report(ctx, transition_report(ctx, &api, &args.id, &request))
}

/// Send a transition and report the amendment's resulting state.
pub async fn transition_report(
    ctx: &Context,
    api: &dyn GovernanceApi,
    id: &str,
    request: &TransitionRequest,
) -> Result<String> {
    tracing::debug!(amendment = id, action = %request.action, actor = request.actor(), "sending transition");
    api.transition_amendment(id, request)
        .await
        .with_context(|| format!("Failed to {} amendment {}", request.action, id))?;

    let detail = api
        .get_amendment(id)
        .await
        .with_context(|| format!("Failed to reload amendment {}", id))?;

    if ctx.json {
        return Ok(output::to_json(&detail)?);
    }
    Ok(format!(
        "{} {} by {}. State is now {}.",
        past_tense(request.action),
        detail.amendment_code,
        request.actor(),
        detail.current_state
    ))
}

fn verb(action: AmendmentAction) -> &'static str {
    match action {
        AmendmentAction::Approve => "Approve",
        AmendmentAction::Reject => "Reject",
        AmendmentAction::Execute => "Execute",
    }
}

fn past_tense(action: AmendmentAction) -> &'static str {
    match action {
        AmendmentAction::Approve => "Approved",
        AmendmentAction::Reject => "Rejected",
        AmendmentAction::Execute => "Executed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{sample_amendment, MockApi, MockOperation};

    fn api() -> MockApi {
        MockApi::new()
            .with_amendment(sample_amendment("a1", AmendmentState::Proposed))
            .with_amendment(sample_amendment("a2", AmendmentState::Approved))
            .with_amendment(sample_amendment("a3", AmendmentState::Rejected))
    }

    fn request(action: AmendmentAction, notes: Option<&str>) -> TransitionRequest {
        TransitionRequest::new(action, "alice", notes).unwrap()
    }

    #[tokio::test]
    async fn list_filters_by_state() {
        let text = list_report(&Context::default(), &api(), Some(AmendmentState::Approved), 1)
            .await
            .unwrap();
        assert!(text.contains("AMD-A2"));
        assert!(!text.contains("AMD-A1"));
        assert!(text.contains("1 amendment total"));
    }

    #[tokio::test]
    async fn show_lists_available_actions() {
        let text = show_report(&Context::default(), &api(), "a2").await.unwrap();
        assert!(text.contains("Actions: execute"));
    }

    #[tokio::test]
    async fn approve_reports_new_state() {
        let api = api();
        let text = transition_report(
            &Context::default(),
            &api,
            "a1",
            &request(AmendmentAction::Approve, Some(" ship it ")),
        )
        .await
        .unwrap();

        assert_eq!(text, "Approved AMD-A1 by alice. State is now APPROVED.");
        assert!(api.operations().contains(&MockOperation::TransitionAmendment {
            amendment_id: "a1".into(),
            action: AmendmentAction::Approve,
            actor: "alice".into(),
            notes: Some("ship it".into()),
        }));
    }

    #[tokio::test]
    async fn rejected_transition_surfaces_backend_message() {
        let err = transition_report(
            &Context::default(),
            &api(),
            "a3",
            &request(AmendmentAction::Execute, None),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Failed to execute amendment a3");
        assert!(format!("{:#}", err).contains("request rejected (409)"));
    }

    #[tokio::test]
    async fn simulate_json() {
        let ctx = Context {
            json: true,
            ..Default::default()
        };
        let text = simulate_report(&ctx, &api(), "a1").await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["predicted_outcome"], "ALLOW");
    }

    #[test]
    fn non_interactive_without_yes_refuses() {
        let args = TransitionArgs {
            id: "a1".into(),
            actor: "alice".into(),
            notes: None,
            yes: false,
        };
        let err = transition(&Context::default(), AmendmentAction::Approve, &args).unwrap_err();
        assert!(err.to_string().contains("Pass --yes"));
    }

    #[test]
    fn blank_actor_rejected_before_prompt() {
        let args = TransitionArgs {
            id: "a1".into(),
            actor: "  ".into(),
            notes: None,
            yes: true,
        };
        let err = transition(&Context::default(), AmendmentAction::Reject, &args).unwrap_err();
        assert_eq!(err.to_string(), "actor is required");
    }
}
