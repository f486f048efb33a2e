//! api::mock
//!
//! In-memory governance API for deterministic testing.
//!
//! # Design
//!
//! `MockApi` stores systems, amendments and trace events in memory, records
//! every call, and can be told to fail a specific operation. Transitions are
//! checked against the amendment's current state the way the backend checks
//! them, so command code sees realistic rejections.
//!
//! # Example
//!
//! ```
//! use vidar::api::mock::{sample_amendment, MockApi};
//! use vidar::api::{AmendmentAction, AmendmentState, GovernanceApi, TransitionRequest};
//!
//! # tokio_test::block_on(async {
//! let api = MockApi::new().with_amendment(sample_amendment("a1", AmendmentState::Proposed));
//!
//! let approve = TransitionRequest::new(AmendmentAction::Approve, "alice", None).unwrap();
//! api.transition_amendment("a1", &approve).await.unwrap();
//!
//! let detail = api.get_amendment("a1").await.unwrap();
//! assert_eq!(detail.current_state, AmendmentState::Approved);
//! # });
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{
    AmendmentAction, AmendmentQuery, ApiError, GovernanceApi, PageRequest, TransitionRequest,
};
use super::types::{
    AmendmentDetail, AmendmentState, AmendmentSummary, AmendmentType, DependencyMap,
    EstateHealth, EvaluationEvent, Outcome, Page, RiskSummary, SimulationResult, SystemSummary,
    TraceEvent, Transition, UtcTimestamp,
};

/// Mock governance API for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    inner: Arc<Mutex<MockApiInner>>,
}

/// Everything known about one system.
#[derive(Debug, Clone)]
struct SystemRecord {
    summary: SystemSummary,
    risk: RiskSummary,
    map: DependencyMap,
    evaluations: Vec<EvaluationEvent>,
}

#[derive(Debug, Default)]
struct MockApiInner {
    estate: EstateHealth,
    /// Systems in insertion order
    systems: Vec<SystemRecord>,
    /// Amendments in insertion order
    amendments: Vec<AmendmentDetail>,
    simulations: HashMap<String, SimulationResult>,
    trace: Vec<TraceEvent>,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    EstateHealth(ApiError),
    ListSystems(ApiError),
    RiskSummary(ApiError),
    DependencyMap(ApiError),
    EvaluationHistory(ApiError),
    ListAmendments(ApiError),
    GetAmendment(ApiError),
    SimulateAmendment(ApiError),
    TransitionAmendment(ApiError),
    GovernanceTrace(ApiError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    EstateHealth,
    ListSystems,
    RiskSummary {
        system_id: String,
    },
    DependencyMap {
        system_id: String,
    },
    EvaluationHistory {
        system_id: String,
        page: PageRequest,
    },
    ListAmendments {
        query: AmendmentQuery,
    },
    GetAmendment {
        amendment_id: String,
    },
    SimulateAmendment {
        amendment_id: String,
    },
    TransitionAmendment {
        amendment_id: String,
        action: AmendmentAction,
        actor: String,
        notes: Option<String>,
    },
    GovernanceTrace,
}

impl MockApi {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the estate health aggregates.
    pub fn with_estate(self, estate: EstateHealth) -> Self {
        self.lock().estate = estate;
        self
    }

    /// Add a system with default risk, map and no evaluations.
    pub fn with_system(self, summary: SystemSummary) -> Self {
        self.lock().systems.push(SystemRecord {
            summary,
            risk: RiskSummary::default(),
            map: DependencyMap::default(),
            evaluations: Vec::new(),
        });
        self
    }

    /// Set the risk summary of an existing system.
    pub fn with_risk(self, system_id: &str, risk: RiskSummary) -> Self {
        if let Some(record) = self.lock().system_mut(system_id) {
            record.risk = risk;
        }
        self
    }

    /// Set the dependency map of an existing system.
    pub fn with_dependency_map(self, system_id: &str, map: DependencyMap) -> Self {
        if let Some(record) = self.lock().system_mut(system_id) {
            record.map = map;
        }
        self
    }

    /// Set the evaluation history of an existing system, newest first.
    pub fn with_evaluations(self, system_id: &str, evaluations: Vec<EvaluationEvent>) -> Self {
        if let Some(record) = self.lock().system_mut(system_id) {
            record.evaluations = evaluations;
        }
        self
    }

    /// Add an amendment.
    pub fn with_amendment(self, amendment: AmendmentDetail) -> Self {
        self.lock().amendments.push(amendment);
        self
    }

    /// Set the simulation result returned for an amendment.
    pub fn with_simulation(self, amendment_id: &str, result: SimulationResult) -> Self {
        self.lock()
            .simulations
            .insert(amendment_id.to_string(), result);
        self
    }

    /// Set the governance trace.
    pub fn with_trace(self, trace: Vec<TraceEvent>) -> Self {
        self.lock().trace = trace;
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Current stored state of an amendment (for test verification).
    pub fn amendment_sync(&self, amendment_id: &str) -> Option<AmendmentDetail> {
        self.lock()
            .amendments
            .iter()
            .find(|a| a.amendment_id == amendment_id)
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockApiInner> {
        // A poisoned lock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: MockOperation) {
        self.lock().operations.push(op);
    }

    /// Return the configured error if `op` should fail.
    fn check_fail(&self, op: &str) -> Result<(), ApiError> {
        let inner = self.lock();
        let error = match &inner.fail_on {
            Some(FailOn::EstateHealth(e)) if op == "estate_health" => e,
            Some(FailOn::ListSystems(e)) if op == "list_systems" => e,
            Some(FailOn::RiskSummary(e)) if op == "risk_summary" => e,
            Some(FailOn::DependencyMap(e)) if op == "dependency_map" => e,
            Some(FailOn::EvaluationHistory(e)) if op == "evaluation_history" => e,
            Some(FailOn::ListAmendments(e)) if op == "list_amendments" => e,
            Some(FailOn::GetAmendment(e)) if op == "get_amendment" => e,
            Some(FailOn::SimulateAmendment(e)) if op == "simulate_amendment" => e,
            Some(FailOn::TransitionAmendment(e)) if op == "transition_amendment" => e,
            Some(FailOn::GovernanceTrace(e)) if op == "governance_trace" => e,
            _ => return Ok(()),
        };
        Err(error.clone())
    }
}

impl MockApiInner {
    fn system(&self, system_id: &str) -> Result<&SystemRecord, ApiError> {
        self.systems
            .iter()
            .find(|s| s.summary.system_id == system_id)
            .ok_or_else(|| ApiError::NotFound(format!("system {}", system_id)))
    }

    fn system_mut(&mut self, system_id: &str) -> Option<&mut SystemRecord> {
        self.systems
            .iter_mut()
            .find(|s| s.summary.system_id == system_id)
    }

    fn amendment(&self, amendment_id: &str) -> Result<&AmendmentDetail, ApiError> {
        self.amendments
            .iter()
            .find(|a| a.amendment_id == amendment_id)
            .ok_or_else(|| ApiError::NotFound(format!("amendment {}", amendment_id)))
    }
}

/// Slice out one page of `items`.
fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let size = page.page_size.max(1) as usize;
    let start = (page.page as usize).saturating_sub(1).saturating_mul(size);
    let slice: Vec<T> = items.iter().skip(start).take(size).cloned().collect();
    Page {
        has_next: start + slice.len() < items.len(),
        total: items.len() as u64,
        items: slice,
    }
}

fn summarize(detail: &AmendmentDetail) -> AmendmentSummary {
    AmendmentSummary {
        amendment_id: detail.amendment_id.clone(),
        amendment_code: detail.amendment_code.clone(),
        current_state: detail.current_state,
        amendment_type: detail.amendment_type,
        proposed_by: detail.proposed_by.clone(),
        proposed_at: detail.proposed_at,
        latest_transition_at: detail
            .transitions
            .last()
            .and_then(|t| t.transitioned_at)
            .or(detail.proposed_at),
    }
}

/// A minimal amendment in `state`, for tests and examples.
pub fn sample_amendment(amendment_id: &str, state: AmendmentState) -> AmendmentDetail {
    AmendmentDetail {
        amendment_id: amendment_id.to_string(),
        amendment_code: format!("AMD-{}", amendment_id.to_uppercase()),
        description: None,
        current_state: state,
        amendment_type: AmendmentType::Modification,
        target_system_id: None,
        proposed_by: Some("proposer".to_string()),
        proposed_at: None,
        resolved_by: None,
        resolved_at: None,
        is_consumed: false,
        consumption: None,
        transitions: Vec::new(),
    }
}

/// A minimal active system, for tests and examples.
pub fn sample_system(system_id: &str, name: &str) -> SystemSummary {
    SystemSummary {
        system_id: system_id.to_string(),
        system_name: name.to_string(),
        layer_id: None,
        sovereignty_level: None,
        is_active: true,
        zero_cloud_required: false,
    }
}

#[async_trait]
impl GovernanceApi for MockApi {
    async fn estate_health(&self) -> Result<EstateHealth, ApiError> {
        self.record(MockOperation::EstateHealth);
        self.check_fail("estate_health")?;
        Ok(self.lock().estate.clone())
    }

    async fn list_systems(&self) -> Result<Vec<SystemSummary>, ApiError> {
        self.record(MockOperation::ListSystems);
        self.check_fail("list_systems")?;
        Ok(self
            .lock()
            .systems
            .iter()
            .map(|s| s.summary.clone())
            .collect())
    }

    async fn risk_summary(&self, system_id: &str) -> Result<RiskSummary, ApiError> {
        self.record(MockOperation::RiskSummary {
            system_id: system_id.to_string(),
        });
        self.check_fail("risk_summary")?;
        Ok(self.lock().system(system_id)?.risk.clone())
    }

    async fn dependency_map(&self, system_id: &str) -> Result<DependencyMap, ApiError> {
        self.record(MockOperation::DependencyMap {
            system_id: system_id.to_string(),
        });
        self.check_fail("dependency_map")?;
        Ok(self.lock().system(system_id)?.map.clone())
    }

    async fn evaluation_history(
        &self,
        system_id: &str,
        page: PageRequest,
    ) -> Result<Page<EvaluationEvent>, ApiError> {
        self.record(MockOperation::EvaluationHistory {
            system_id: system_id.to_string(),
            page,
        });
        self.check_fail("evaluation_history")?;
        let inner = self.lock();
        let record = inner.system(system_id)?;
        let events = paginate(&record.evaluations, page);
        Ok(events)
    }

    async fn list_amendments(
        &self,
        query: AmendmentQuery,
    ) -> Result<Page<AmendmentSummary>, ApiError> {
        self.record(MockOperation::ListAmendments { query });
        self.check_fail("list_amendments")?;
        let inner = self.lock();
        let matching: Vec<AmendmentSummary> = inner
            .amendments
            .iter()
            .filter(|a| query.state.map_or(true, |s| a.current_state == s))
            .map(summarize)
            .collect();
        Ok(paginate(&matching, query.page))
    }

    async fn get_amendment(&self, amendment_id: &str) -> Result<AmendmentDetail, ApiError> {
        self.record(MockOperation::GetAmendment {
            amendment_id: amendment_id.to_string(),
        });
        self.check_fail("get_amendment")?;
        Ok(self.lock().amendment(amendment_id)?.clone())
    }

    async fn simulate_amendment(
        &self,
        amendment_id: &str,
    ) -> Result<SimulationResult, ApiError> {
        self.record(MockOperation::SimulateAmendment {
            amendment_id: amendment_id.to_string(),
        });
        self.check_fail("simulate_amendment")?;
        let inner = self.lock();
        inner.amendment(amendment_id)?;
        let result = inner.simulations.get(amendment_id).cloned();
        Ok(result.unwrap_or_else(|| SimulationResult {
            simulated_event_type: Some("AMENDMENT_SIMULATION".to_string()),
            predicted_outcome: Outcome::Allow,
            predicted_violations: Vec::new(),
            risk_delta: Default::default(),
            affected_downstream_system_ids: Vec::new(),
        }))
    }

    async fn transition_amendment(
        &self,
        amendment_id: &str,
        request: &TransitionRequest,
    ) -> Result<(), ApiError> {
        self.record(MockOperation::TransitionAmendment {
            amendment_id: amendment_id.to_string(),
            action: request.action,
            actor: request.actor().to_string(),
            notes: request.notes().map(str::to_string),
        });
        self.check_fail("transition_amendment")?;

        let mut inner = self.lock();
        let amendment = inner
            .amendments
            .iter_mut()
            .find(|a| a.amendment_id == amendment_id)
            .ok_or_else(|| ApiError::NotFound(format!("amendment {}", amendment_id)))?;

        let from = amendment.current_state;
        if !from.available_actions().contains(&request.action) {
            return Err(ApiError::Rejected {
                status: 409,
                message: format!("cannot {} an amendment in state {}", request.action, from),
            });
        }

        let to = match request.action {
            AmendmentAction::Approve => AmendmentState::Approved,
            AmendmentAction::Reject => AmendmentState::Rejected,
            AmendmentAction::Execute => AmendmentState::Executed,
        };
        let now = UtcTimestamp::from_datetime(Utc::now());

        amendment.current_state = to;
        if to.is_terminal() {
            amendment.resolved_by = Some(request.actor().to_string());
            amendment.resolved_at = Some(now);
        }
        let transition_id = (amendment.transitions.len() + 1).to_string();
        amendment.transitions.push(Transition {
            transition_id: Some(transition_id),
            from_state: Some(from),
            to_state: to,
            transitioned_at: Some(now),
            transitioned_by: Some(request.actor().to_string()),
            notes: request.notes().map(str::to_string),
        });

        Ok(())
    }

    async fn governance_trace(&self) -> Result<Vec<TraceEvent>, ApiError> {
        self.record(MockOperation::GovernanceTrace);
        self.check_fail("governance_trace")?;
        Ok(self.lock().trace.clone())
    }
}
