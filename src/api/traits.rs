//! api::traits
//!
//! The `GovernanceApi` trait and its request types.
//!
//! # Design
//!
//! The trait is async because every call is network I/O. Commands depend on
//! `&dyn GovernanceApi`, so they run unchanged against [`HttpApi`] in
//! production and [`MockApi`] in tests.
//!
//! [`HttpApi`]: super::client::HttpApi
//! [`MockApi`]: super::mock::MockApi

use std::fmt;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use super::types::{
    AmendmentDetail, AmendmentState, AmendmentSummary, DependencyMap, EstateHealth,
    EvaluationEvent, Page, RiskSummary, SimulationResult, SystemSummary, TraceEvent,
};

/// Errors from API operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The proxy refused the caller (401/403).
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend rejected the request (other 4xx, e.g. an illegal transition).
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// The backend failed (5xx).
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Pagination parameters; pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Create a page request, clamping `page` to at least 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// Query parameters for this request.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ]
    }
}

/// Filter and page for `list_amendments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmendmentQuery {
    /// Only amendments in this state; `None` lists all.
    pub state: Option<AmendmentState>,
    pub page: PageRequest,
}

impl AmendmentQuery {
    /// Query parameters for this request.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = self.page.query();
        if let Some(state) = self.state {
            params.push(("state", state.as_str().to_string()));
        }
        params
    }
}

/// Operator action on an amendment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmendmentAction {
    Approve,
    Reject,
    Execute,
}

impl AmendmentAction {
    /// Path segment under `/amendments/{id}/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            AmendmentAction::Approve => "approve",
            AmendmentAction::Reject => "reject",
            AmendmentAction::Execute => "execute",
        }
    }

    /// Body key naming the actor.
    ///
    /// Executing resolves the amendment; the other actions transition it.
    pub fn actor_key(&self) -> &'static str {
        match self {
            AmendmentAction::Execute => "resolved_by",
            AmendmentAction::Approve | AmendmentAction::Reject => "transitioned_by",
        }
    }
}

impl fmt::Display for AmendmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl AmendmentState {
    /// Whether the workflow has ended for this amendment.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AmendmentState::Executed | AmendmentState::Rejected | AmendmentState::Withdrawn
        )
    }

    /// Actions an operator is offered in this state.
    ///
    /// This only decides what the CLI offers; the backend validates every
    /// transition itself.
    pub fn available_actions(&self) -> &'static [AmendmentAction] {
        match self {
            AmendmentState::Proposed | AmendmentState::UnderReview => {
                &[AmendmentAction::Approve, AmendmentAction::Reject]
            }
            AmendmentState::Approved => &[AmendmentAction::Execute],
            _ => &[],
        }
    }
}

/// Errors building a transition request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("actor is required")]
    MissingActor,
}

/// A validated amendment transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub action: AmendmentAction,
    actor: String,
    notes: Option<String>,
}

impl TransitionRequest {
    /// Build a request, trimming the actor and notes.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::MissingActor` if the actor is blank.
    pub fn new(
        action: AmendmentAction,
        actor: &str,
        notes: Option<&str>,
    ) -> Result<Self, TransitionError> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(TransitionError::MissingActor);
        }
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());

        Ok(Self {
            action,
            actor: actor.to_string(),
            notes: notes.map(str::to_string),
        })
    }

    /// Who performed the action.
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Optional rationale.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// JSON request body.
    pub fn body(&self) -> Value {
        let mut body = json!({ "notes": self.notes });
        body[self.action.actor_key()] = Value::String(self.actor.clone());
        body
    }
}

/// Client for the internal governance API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// - `Unauthorized`: the proxy token is missing or wrong
/// - `NotFound`: unknown system or amendment id
/// - `Rejected`: the backend refused the request (e.g. illegal transition)
/// - `Server` / `Network`: retry later
#[async_trait]
pub trait GovernanceApi: Send + Sync {
    /// Estate-wide health aggregates.
    async fn estate_health(&self) -> Result<EstateHealth, ApiError>;

    /// All systems.
    async fn list_systems(&self) -> Result<Vec<SystemSummary>, ApiError>;

    /// Risk aggregates for one system.
    async fn risk_summary(&self, system_id: &str) -> Result<RiskSummary, ApiError>;

    /// Interfaces and components of one system.
    async fn dependency_map(&self, system_id: &str) -> Result<DependencyMap, ApiError>;

    /// Paginated evaluation history of one system.
    async fn evaluation_history(
        &self,
        system_id: &str,
        page: PageRequest,
    ) -> Result<Page<EvaluationEvent>, ApiError>;

    /// Paginated amendments, optionally filtered by state.
    async fn list_amendments(
        &self,
        query: AmendmentQuery,
    ) -> Result<Page<AmendmentSummary>, ApiError>;

    /// Full record of one amendment.
    async fn get_amendment(&self, amendment_id: &str) -> Result<AmendmentDetail, ApiError>;

    /// Predict the governance impact of executing an amendment.
    async fn simulate_amendment(&self, amendment_id: &str)
        -> Result<SimulationResult, ApiError>;

    /// Approve, reject or execute an amendment.
    async fn transition_amendment(
        &self,
        amendment_id: &str,
        request: &TransitionRequest,
    ) -> Result<(), ApiError>;

    /// Governance trace events.
    async fn governance_trace(&self) -> Result<Vec<TraceEvent>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_by_state() {
        use AmendmentAction::*;

        assert_eq!(AmendmentState::Proposed.available_actions(), &[Approve, Reject]);
        assert_eq!(AmendmentState::UnderReview.available_actions(), &[Approve, Reject]);
        assert_eq!(AmendmentState::Approved.available_actions(), &[Execute]);
        for state in [
            AmendmentState::Executed,
            AmendmentState::Rejected,
            AmendmentState::Withdrawn,
            AmendmentState::Unknown,
        ] {
            assert!(state.available_actions().is_empty(), "{}", state);
        }
    }

    #[test]
    fn terminal_states() {
        assert!(AmendmentState::Executed.is_terminal());
        assert!(AmendmentState::Rejected.is_terminal());
        assert!(AmendmentState::Withdrawn.is_terminal());
        assert!(!AmendmentState::Proposed.is_terminal());
        assert!(!AmendmentState::Approved.is_terminal());
    }

    #[test]
    fn transition_body_uses_action_specific_actor_key() {
        let approve = TransitionRequest::new(AmendmentAction::Approve, " alice ", None).unwrap();
        assert_eq!(
            approve.body(),
            json!({"transitioned_by": "alice", "notes": null})
        );

        let execute =
            TransitionRequest::new(AmendmentAction::Execute, "ops-bot", Some(" done ")).unwrap();
        assert_eq!(
            execute.body(),
            json!({"resolved_by": "ops-bot", "notes": "done"})
        );
    }

    #[test]
    fn blank_actor_rejected() {
        assert_eq!(
            TransitionRequest::new(AmendmentAction::Reject, "   ", None),
            Err(TransitionError::MissingActor)
        );
    }

    #[test]
    fn blank_notes_become_none() {
        let req = TransitionRequest::new(AmendmentAction::Reject, "bob", Some("  ")).unwrap();
        assert!(req.notes().is_none());
        assert_eq!(req.actor(), "bob");
    }

    #[test]
    fn page_request_clamps_to_first_page() {
        assert_eq!(PageRequest::new(0, 20).page, 1);
    }

    #[test]
    fn amendment_query_params() {
        let all = AmendmentQuery {
            state: None,
            page: PageRequest::new(2, 20),
        };
        assert_eq!(
            all.query(),
            vec![("page", "2".to_string()), ("page_size", "20".to_string())]
        );

        let filtered = AmendmentQuery {
            state: Some(AmendmentState::UnderReview),
            page: PageRequest::new(1, 20),
        };
        assert!(filtered
            .query()
            .contains(&("state", "UNDER_REVIEW".to_string())));
    }

    #[test]
    fn api_error_display() {
        assert_eq!(
            ApiError::NotFound("amendment a1".into()).to_string(),
            "not found: amendment a1"
        );
        assert_eq!(
            ApiError::Rejected {
                status: 409,
                message: "illegal transition".into()
            }
            .to_string(),
            "request rejected (409): illegal transition"
        );
    }
}
