//! End-to-end amendment workflow through the command layer.
//!
//! Drives the `*_report` handlers against an in-memory backend: list,
//! inspect, approve, execute, and the rejections the backend hands back for
//! out-of-order transitions.

use vidar::api::mock::{sample_amendment, FailOn, MockApi, MockOperation};
use vidar::api::{
    AmendmentAction, AmendmentState, ApiError, GovernanceApi, Outcome, SimulationResult,
    TransitionRequest,
};
use vidar::cli::{commands, Context};

fn backend() -> MockApi {
    MockApi::new()
        .with_amendment(sample_amendment("a1", AmendmentState::Proposed))
        .with_amendment(sample_amendment("a2", AmendmentState::Executed))
        .with_simulation(
            "a1",
            SimulationResult {
                simulated_event_type: Some("SUBSTITUTION".into()),
                predicted_outcome: Outcome::Deny,
                predicted_violations: Vec::new(),
                risk_delta: Default::default(),
                affected_downstream_system_ids: vec!["s-9".into()],
            },
        )
}

fn request(action: AmendmentAction, actor: &str) -> TransitionRequest {
    TransitionRequest::new(action, actor, None).unwrap()
}

#[tokio::test]
async fn approve_then_execute_reaches_terminal_state() {
    let ctx = Context::default();
    let api = backend();

    let before = commands::amendments_show_report(&ctx, &api, "a1")
        .await
        .unwrap();
    assert!(before.contains("Actions: approve, reject"));

    let approved = commands::transition_report(
        &ctx,
        &api,
        "a1",
        &request(AmendmentAction::Approve, "alice"),
    )
    .await
    .unwrap();
    assert_eq!(approved, "Approved AMD-A1 by alice. State is now APPROVED.");

    let executed = commands::transition_report(
        &ctx,
        &api,
        "a1",
        &request(AmendmentAction::Execute, "bob"),
    )
    .await
    .unwrap();
    assert!(executed.ends_with("State is now EXECUTED."));

    let after = commands::amendments_show_report(&ctx, &api, "a1")
        .await
        .unwrap();
    assert!(after.contains("Actions: none (EXECUTED is terminal)"));

    let stored = api.amendment_sync("a1").unwrap();
    assert_eq!(stored.resolved_by.as_deref(), Some("bob"));
    assert_eq!(stored.transitions.len(), 2);
}

#[tokio::test]
async fn executing_unapproved_amendment_is_rejected() {
    let ctx = Context::default();
    let api = backend();

    let err = commands::transition_report(
        &ctx,
        &api,
        "a1",
        &request(AmendmentAction::Execute, "bob"),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to execute amendment a1");
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Rejected { status: 409, .. })
    ));
    assert_eq!(
        api.amendment_sync("a1").unwrap().current_state,
        AmendmentState::Proposed
    );
}

#[tokio::test]
async fn list_filters_by_state() {
    let ctx = Context::default();
    let api = backend();

    let text = commands::amendments_list_report(&ctx, &api, Some(AmendmentState::Executed), 1)
        .await
        .unwrap();
    assert!(text.contains("AMD-A2"));
    assert!(!text.contains("AMD-A1"));

    let ops = api.operations();
    assert!(matches!(
        &ops[0],
        MockOperation::ListAmendments { query } if query.state == Some(AmendmentState::Executed)
    ));
}

#[tokio::test]
async fn simulation_report_shows_prediction() {
    let ctx = Context::default();
    let api = backend();

    let text = commands::simulate_report(&ctx, &api, "a1").await.unwrap();
    assert!(text.contains("DENY"));
    assert!(text.contains("No violations predicted."));
    assert!(text.contains("Affected Downstream (1)"));
}

#[tokio::test]
async fn json_report_is_the_reloaded_amendment() {
    let ctx = Context {
        json: true,
        ..Context::default()
    };
    let api = backend();

    let text = commands::transition_report(
        &ctx,
        &api,
        "a1",
        &request(AmendmentAction::Reject, "carol"),
    )
    .await
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["current_state"], "REJECTED");
    assert_eq!(value["amendment_code"], "AMD-A1");
}

#[tokio::test]
async fn backend_failure_carries_context() {
    let ctx = Context::default();
    let api = backend().fail_on(FailOn::GetAmendment(ApiError::Network(
        "connection refused".into(),
    )));

    let err = commands::amendments_show_report(&ctx, &api, "a1")
        .await
        .unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "Failed to load amendment a1: network error: connection refused"
    );

    api.clear_fail_on();
    assert!(api.get_amendment("a1").await.is_ok());
}
