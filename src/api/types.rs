//! api::types
//!
//! Resources returned by the internal governance API.
//!
//! # Compatibility
//!
//! Unknown fields are ignored and unknown enum values decode to an
//! `Unknown` variant, so a newer backend never breaks rendering. Identifiers
//! are accepted as JSON strings or numbers and kept as strings.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Scalars
// =============================================================================

/// A UTC timestamp.
///
/// Decodes RFC 3339 strings and naive `YYYY-MM-DDTHH:MM:SS[.fff]` strings,
/// which are taken to be UTC. Displays as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcTimestamp(DateTime<Utc>);

impl UtcTimestamp {
    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse a timestamp string.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }
}

impl TryFrom<String> for UtcTimestamp {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid timestamp: {}", value))
    }
}

impl From<UtcTimestamp> for String {
    fn from(ts: UtcTimestamp) -> Self {
        ts.to_string()
    }
}

impl fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Deserialize an identifier that may be a JSON string or number.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Optional variant of [`id_string`]; `null` decodes to `None`.
fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// List variant of [`id_string`].
fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number id, got {}",
                other
            ))),
        })
        .collect()
}

/// Decode `null` as the type's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// Value this client does not recognise.
            Unknown,
        }

        impl $name {
            /// Wire spelling of the value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown => "UNKNOWN",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(match raw.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Unknown,
                })
            }
        }
    };
}

wire_enum! {
    /// Sovereignty classification of a system, component or product.
    pub enum SovereigntyLevel {
        Sovereign => "SOVEREIGN",
        Approved => "APPROVED",
        Conditional => "CONDITIONAL",
        Restricted => "RESTRICTED",
        Prohibited => "PROHIBITED",
    }
}

wire_enum! {
    /// Result of a governance evaluation.
    pub enum Outcome {
        Allow => "ALLOW",
        Flag => "FLAG",
        Deny => "DENY",
    }
}

wire_enum! {
    /// Violation severity, assigned by the evaluation engine.
    pub enum Severity {
        Critical => "CRITICAL",
        Warning => "WARNING",
        Informational => "INFORMATIONAL",
    }
}

wire_enum! {
    /// Amendment workflow state.
    pub enum AmendmentState {
        Proposed => "PROPOSED",
        UnderReview => "UNDER_REVIEW",
        Approved => "APPROVED",
        Executed => "EXECUTED",
        Rejected => "REJECTED",
        Withdrawn => "WITHDRAWN",
    }
}

wire_enum! {
    /// Kind of change an amendment proposes.
    pub enum AmendmentType {
        Substitution => "SUBSTITUTION",
        Modification => "MODIFICATION",
        Decommission => "DECOMMISSION",
        Addition => "ADDITION",
    }
}

// =============================================================================
// Estate
// =============================================================================

/// Estate-wide health aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstateHealth {
    pub total_systems: u64,
    pub active_systems: u64,
    pub inactive_systems: u64,
    pub total_evaluations_last_30_days: u64,
    pub systems_with_deny_last_30_days: u64,
    pub systems_with_flag_last_30_days: u64,
    pub total_critical_violations_last_30_days: u64,
    pub total_warning_violations_last_30_days: u64,
    pub systems_with_product_advisory_violations: u64,
    pub systems_with_sovereignty_advisory_violations: u64,
}

impl EstateHealth {
    /// Active systems as a rounded percentage of the total (0 when empty).
    pub fn active_percentage(&self) -> u64 {
        if self.total_systems == 0 {
            return 0;
        }
        (self.active_systems * 100 + self.total_systems / 2) / self.total_systems
    }
}

// =============================================================================
// Systems
// =============================================================================

/// A system as listed by `GET /systems`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    #[serde(deserialize_with = "id_string")]
    pub system_id: String,
    pub system_name: String,
    #[serde(default)]
    pub layer_id: Option<i64>,
    #[serde(default)]
    pub sovereignty_level: Option<SovereigntyLevel>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub zero_cloud_required: bool,
}

fn default_true() -> bool {
    true
}

/// Evaluation counts over a seven-day window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWindow {
    pub evaluations: u64,
    pub deny: u64,
    pub flag: u64,
}

/// Per-system risk aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSummary {
    pub total_evaluations: u64,
    pub total_allow: u64,
    pub total_flag: u64,
    pub total_deny: u64,
    pub total_critical_violations: u64,
    pub total_warning_violations: u64,
    pub most_violated_rule_code: Option<String>,
    pub last_7_days: RiskWindow,
    pub previous_7_days: RiskWindow,
}

/// A neighbouring system in the dependency map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfacePeer {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub system_id: Option<String>,
    pub system_name: String,
    #[serde(default)]
    pub sovereignty_level: Option<SovereigntyLevel>,
}

/// Upstream and downstream neighbours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interfaces {
    pub upstream: Vec<InterfacePeer>,
    pub downstream: Vec<InterfacePeer>,
}

/// Vendor product backing a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub canonical_name: String,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub vendor_country: Option<String>,
    #[serde(default)]
    pub sovereignty_level: Option<SovereigntyLevel>,
    #[serde(default)]
    pub zero_cloud_capable: bool,
}

/// An active component of a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(deserialize_with = "id_string")]
    pub component_id: String,
    pub component_name: String,
    #[serde(default)]
    pub sovereignty_level: Option<SovereigntyLevel>,
    #[serde(default)]
    pub product: Option<Product>,
}

/// A system's interfaces and components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyMap {
    pub interfaces: Interfaces,
    pub components: Vec<Component>,
}

/// A rule violation reported by the evaluation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_code: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One governance evaluation of a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEvent {
    #[serde(deserialize_with = "id_string")]
    pub event_id: String,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub triggered_at: Option<UtcTimestamp>,
    #[serde(default)]
    pub triggered_by: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub violations: Vec<Violation>,
}

/// A page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_default")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_next: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            has_next: false,
        }
    }
}

// =============================================================================
// Amendments
// =============================================================================

/// An amendment as listed by `GET /amendments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmendmentSummary {
    #[serde(deserialize_with = "id_string")]
    pub amendment_id: String,
    pub amendment_code: String,
    pub current_state: AmendmentState,
    pub amendment_type: AmendmentType,
    #[serde(default)]
    pub proposed_by: Option<String>,
    #[serde(default)]
    pub proposed_at: Option<UtcTimestamp>,
    #[serde(default)]
    pub latest_transition_at: Option<UtcTimestamp>,
}

/// Record of an amendment having been consumed by a downstream operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    #[serde(default)]
    pub consumed_at: Option<UtcTimestamp>,
    #[serde(default)]
    pub consumed_by_op: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub consuming_entity_id: Option<String>,
    #[serde(default)]
    pub consuming_entity_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One recorded state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub transition_id: Option<String>,
    #[serde(default)]
    pub from_state: Option<AmendmentState>,
    pub to_state: AmendmentState,
    #[serde(default)]
    pub transitioned_at: Option<UtcTimestamp>,
    #[serde(default)]
    pub transitioned_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Full amendment record from `GET /amendments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmendmentDetail {
    #[serde(deserialize_with = "id_string")]
    pub amendment_id: String,
    pub amendment_code: String,
    #[serde(default)]
    pub description: Option<String>,
    pub current_state: AmendmentState,
    pub amendment_type: AmendmentType,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub target_system_id: Option<String>,
    #[serde(default)]
    pub proposed_by: Option<String>,
    #[serde(default)]
    pub proposed_at: Option<UtcTimestamp>,
    #[serde(default)]
    pub resolved_by: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<UtcTimestamp>,
    #[serde(default)]
    pub is_consumed: bool,
    #[serde(default)]
    pub consumption: Option<Consumption>,
    #[serde(default, deserialize_with = "null_default")]
    pub transitions: Vec<Transition>,
}

/// Change in risk an amendment would cause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskDelta {
    pub current_outcome: Option<Outcome>,
    pub outcome_changed: bool,
    pub critical_delta: i64,
    pub warning_delta: i64,
}

/// Result of `POST /amendments/{id}/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub simulated_event_type: Option<String>,
    pub predicted_outcome: Outcome,
    #[serde(default, deserialize_with = "null_default")]
    pub predicted_violations: Vec<Violation>,
    #[serde(default)]
    pub risk_delta: RiskDelta,
    #[serde(default, deserialize_with = "id_list")]
    pub affected_downstream_system_ids: Vec<String>,
}

// =============================================================================
// Governance trace
// =============================================================================

/// A governance trace event.
///
/// Trace payloads differ between deployments, so events are built from
/// loosely shaped JSON rather than a fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    /// `event_id`, `id`, or the event's position in the response
    pub id: String,
    /// `event_type`, `type`, or `"event"`
    pub title: String,
    /// `timestamp`, `created_at`, or `occurred_at`
    pub timestamp: Option<UtcTimestamp>,
    pub message: Option<String>,
}

impl TraceEvent {
    /// Build an event from one JSON object.
    pub fn from_value(value: &Value, position: usize) -> Self {
        let text = |key: &str| match value.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let id = text("event_id")
            .or_else(|| text("id"))
            .unwrap_or_else(|| position.to_string());
        let title = text("event_type")
            .or_else(|| text("type"))
            .unwrap_or_else(|| "event".to_string());
        let timestamp = ["timestamp", "created_at", "occurred_at"]
            .iter()
            .find_map(|k| text(k))
            .and_then(|s| UtcTimestamp::parse(&s));
        let message = match value.get("message") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Self {
            id,
            title,
            timestamp,
            message,
        }
    }

    /// Extract events from a trace response body.
    ///
    /// Accepts `{"items": [...]}` or a bare array; any other shape yields no
    /// events.
    pub fn list_from_body(body: &Value) -> Vec<Self> {
        let items = match body {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("items") {
                Some(Value::Array(items)) => items,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, v)| Self::from_value(v, i))
            .collect()
    }
}
