//! ui::render
//!
//! Text renderers for every view.
//!
//! # Design
//!
//! Renderers are pure: they take decoded API resources (and the rule
//! registry, wherever a rule code is shown) and return the complete text of
//! a view. Commands decide where the text goes. Absent values render as
//! [`ABSENT`]; timestamps render as RFC 3339 UTC.

use std::fmt::Display;

use crate::api::{
    AmendmentDetail, AmendmentSummary, Component, DependencyMap, EstateHealth, EvaluationEvent,
    InterfacePeer, Page, RiskSummary, RiskWindow, SimulationResult, SovereigntyLevel,
    SystemSummary, TraceEvent, UtcTimestamp, Violation,
};
use crate::rules::{RuleMetadata, RuleRegistry, POLICY_VERSION};

/// Placeholder for a missing value.
pub const ABSENT: &str = "—";

/// Characters of a downstream id kept by [`short_id`].
pub const SHORT_ID_LEN: usize = 8;

fn or_absent<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| v.to_string())
}

fn ts(value: Option<&UtcTimestamp>) -> String {
    or_absent(value)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn plural(count: u64, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Shorten an id to its first [`SHORT_ID_LEN`] characters plus `…`.
///
/// Ids that already fit are returned unchanged.
pub fn short_id(id: &str) -> String {
    if id.chars().count() <= SHORT_ID_LEN {
        return id.to_string();
    }
    let head: String = id.chars().take(SHORT_ID_LEN).collect();
    format!("{}…", head)
}

/// Render a delta with an explicit sign for positive values.
pub fn signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

/// Lay out rows under headers with left-aligned, padded columns.
fn table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = vec![line(headers.to_vec())];
    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }
    lines
}

fn stat(label: &str, value: impl Display) -> String {
    format!("  {:<22}{}", label, value)
}

fn level(value: Option<SovereigntyLevel>) -> String {
    or_absent(value)
}

// =============================================================================
// Estate
// =============================================================================

/// Estate overview.
pub fn estate(health: &EstateHealth) -> String {
    let lines = vec![
        "Estate Overview".to_string(),
        String::new(),
        "Systems".to_string(),
        stat("Total", health.total_systems),
        stat(
            "Active",
            format!("{} ({}%)", health.active_systems, health.active_percentage()),
        ),
        stat("Inactive", health.inactive_systems),
        String::new(),
        "Last 30 Days".to_string(),
        stat("Evaluations", health.total_evaluations_last_30_days),
        stat("Systems w/ DENY", health.systems_with_deny_last_30_days),
        stat("Systems w/ FLAG", health.systems_with_flag_last_30_days),
        stat(
            "Critical violations",
            health.total_critical_violations_last_30_days,
        ),
        stat(
            "Warning violations",
            health.total_warning_violations_last_30_days,
        ),
        String::new(),
        "Advisory (All Time)".to_string(),
        stat(
            "Product advisory",
            health.systems_with_product_advisory_violations,
        ),
        stat(
            "Sovereignty advisory",
            health.systems_with_sovereignty_advisory_violations,
        ),
    ];
    lines.join("\n")
}

// =============================================================================
// Systems
// =============================================================================

/// Systems list.
pub fn systems_list(systems: &[SystemSummary]) -> String {
    if systems.is_empty() {
        return "No systems registered".to_string();
    }

    let rows: Vec<Vec<String>> = systems
        .iter()
        .map(|s| {
            vec![
                s.system_id.clone(),
                s.system_name.clone(),
                or_absent(s.layer_id.map(|l| format!("L{}", l))),
                level(s.sovereignty_level),
                if s.is_active { "active" } else { "INACTIVE" }.to_string(),
                yes_no(s.zero_cloud_required).to_string(),
            ]
        })
        .collect();

    let mut lines = table(
        &["ID", "NAME", "LAYER", "SOVEREIGNTY", "STATUS", "ZERO CLOUD"],
        &rows,
    );
    lines.push(String::new());
    lines.push(plural(systems.len() as u64, "system"));
    lines.join("\n")
}

fn window(title: &str, w: &RiskWindow) -> Vec<String> {
    vec![
        title.to_string(),
        stat("Evaluations", w.evaluations),
        stat("Deny", w.deny),
        stat("Flag", w.flag),
    ]
}

/// Risk tab of a system.
pub fn risk_summary(risk: &RiskSummary, rules: &RuleRegistry) -> String {
    let mut lines = vec![
        "All Time".to_string(),
        stat("Total evaluations", risk.total_evaluations),
        stat("Allow", risk.total_allow),
        stat("Flag", risk.total_flag),
        stat("Deny", risk.total_deny),
        stat("Critical violations", risk.total_critical_violations),
        stat("Warning violations", risk.total_warning_violations),
        stat(
            "Most violated rule",
            or_absent(
                risk.most_violated_rule_code
                    .as_deref()
                    .map(|code| rules.annotate(code)),
            ),
        ),
        String::new(),
    ];
    lines.extend(window("Last 7 Days", &risk.last_7_days));
    lines.push(String::new());
    lines.extend(window("Prev 7 Days", &risk.previous_7_days));
    lines.join("\n")
}

fn peers(title: &str, peers: &[InterfacePeer], empty: &str) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", title, peers.len())];
    if peers.is_empty() {
        lines.push(format!("  {}", empty));
    }
    for peer in peers {
        lines.push(format!(
            "  {}  {}  {}",
            peer.system_name,
            or_absent(peer.system_id.as_deref()),
            level(peer.sovereignty_level)
        ));
    }
    lines
}

fn component_row(c: &Component) -> Vec<String> {
    match &c.product {
        Some(p) => vec![
            c.component_name.clone(),
            level(c.sovereignty_level),
            p.canonical_name.clone(),
            or_absent(p.vendor_name.as_deref()),
            or_absent(p.vendor_country.as_deref()),
            yes_no(p.zero_cloud_capable).to_string(),
        ],
        None => vec![
            c.component_name.clone(),
            level(c.sovereignty_level),
            "(no product linked)".to_string(),
            ABSENT.to_string(),
            ABSENT.to_string(),
            ABSENT.to_string(),
        ],
    }
}

/// Dependency tab of a system.
pub fn dependency_map(map: &DependencyMap) -> String {
    let mut lines = peers(
        "Upstream",
        &map.interfaces.upstream,
        "No upstream interfaces",
    );
    lines.push(String::new());
    lines.extend(peers(
        "Downstream",
        &map.interfaces.downstream,
        "No downstream interfaces",
    ));
    lines.push(String::new());
    lines.push(format!("Components ({})", map.components.len()));

    if map.components.is_empty() {
        lines.push("  No active components".to_string());
    } else {
        let rows: Vec<Vec<String>> = map.components.iter().map(component_row).collect();
        let table_lines = table(
            &["COMPONENT", "SOVEREIGNTY", "PRODUCT", "VENDOR", "COUNTRY", "ZERO CLOUD"],
            &rows,
        );
        lines.extend(table_lines.into_iter().map(|l| format!("  {}", l)));
    }

    lines.join("\n")
}

fn violation_codes(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return ABSENT.to_string();
    }
    violations
        .iter()
        .map(|v| v.rule_code.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Footer shown under a paginated list.
fn page_footer<T>(page: &Page<T>, current: u32, noun: &str) -> String {
    let mut footer = format!("Page {} · {} total", current, plural(page.total, noun));
    if page.has_next {
        footer.push_str(&format!(" · next: --page {}", current.saturating_add(1)));
    }
    footer
}

/// Evaluations tab of a system.
///
/// The table shows bare rule codes; every distinct code seen on the page is
/// then listed once with its registry annotation.
pub fn evaluation_history(
    page: &Page<EvaluationEvent>,
    current: u32,
    rules: &RuleRegistry,
) -> String {
    if page.items.is_empty() {
        return ["No evaluations".to_string(), String::new(), page_footer(page, current, "evaluation")]
            .join("\n");
    }

    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|ev| {
            vec![
                ts(ev.triggered_at.as_ref()),
                or_absent(ev.event_type.as_deref()),
                or_absent(ev.outcome),
                violation_codes(&ev.violations),
                or_absent(ev.triggered_by.as_deref()),
            ]
        })
        .collect();

    let mut lines = table(
        &["TRIGGERED", "EVENT TYPE", "OUTCOME", "VIOLATIONS", "TRIGGERED BY"],
        &rows,
    );

    let mut codes: Vec<&str> = Vec::new();
    for v in page.items.iter().flat_map(|ev| &ev.violations) {
        if !codes.contains(&v.rule_code.as_str()) {
            codes.push(&v.rule_code);
        }
    }
    if !codes.is_empty() {
        lines.push(String::new());
        lines.push("Rules".to_string());
        for code in codes {
            lines.push(format!("  {}", rules.annotate(code)));
        }
    }

    lines.push(String::new());
    lines.push(page_footer(page, current, "evaluation"));
    lines.join("\n")
}

// =============================================================================
// Amendments
// =============================================================================

/// Amendments list.
pub fn amendments_list(page: &Page<AmendmentSummary>, current: u32) -> String {
    if page.items.is_empty() {
        return ["No amendments".to_string(), String::new(), page_footer(page, current, "amendment")]
            .join("\n");
    }

    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|a| {
            vec![
                a.amendment_id.clone(),
                a.amendment_code.clone(),
                a.current_state.to_string(),
                a.amendment_type.to_string(),
                or_absent(a.proposed_by.as_deref()),
                ts(a.latest_transition_at.as_ref()),
            ]
        })
        .collect();

    let mut lines = table(
        &["ID", "CODE", "STATE", "TYPE", "PROPOSED BY", "LAST TRANSITION"],
        &rows,
    );
    lines.push(String::new());
    lines.push(page_footer(page, current, "amendment"));
    lines.join("\n")
}

/// Amendment detail, including the actions offered in its current state.
pub fn amendment_detail(detail: &AmendmentDetail) -> String {
    let mut lines = vec![
        format!(
            "{}  {}  {}",
            detail.amendment_code, detail.current_state, detail.amendment_type
        ),
        String::new(),
    ];
    if let Some(description) = &detail.description {
        lines.push(description.clone());
        lines.push(String::new());
    }

    lines.push(stat("Amendment ID", &detail.amendment_id));
    lines.push(stat(
        "Target system",
        or_absent(detail.target_system_id.as_deref()),
    ));
    lines.push(stat("Proposed by", or_absent(detail.proposed_by.as_deref())));
    lines.push(stat("Proposed at", ts(detail.proposed_at.as_ref())));
    lines.push(stat("Resolved by", or_absent(detail.resolved_by.as_deref())));
    lines.push(stat("Resolved at", ts(detail.resolved_at.as_ref())));

    lines.push(String::new());
    let actions = detail.current_state.available_actions();
    if detail.current_state.is_terminal() {
        lines.push(format!("Actions: none ({} is terminal)", detail.current_state));
    } else if actions.is_empty() {
        lines.push("Actions: none".to_string());
    } else {
        let names: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
        lines.push(format!("Actions: {}", names.join(", ")));
    }

    if detail.is_consumed {
        lines.push(String::new());
        lines.push("Consumed".to_string());
        match &detail.consumption {
            Some(c) => {
                lines.push(stat("Consumed at", ts(c.consumed_at.as_ref())));
                lines.push(stat("Operation", or_absent(c.consumed_by_op.as_deref())));
                lines.push(stat("Entity", or_absent(c.consuming_entity_id.as_deref())));
                lines.push(stat(
                    "Entity type",
                    or_absent(c.consuming_entity_type.as_deref()),
                ));
                if let Some(notes) = &c.notes {
                    lines.push(stat("Notes", notes));
                }
            }
            None => lines.push(format!("  {}", ABSENT)),
        }
    }

    lines.push(String::new());
    lines.push(format!("Transitions ({})", detail.transitions.len()));
    if detail.transitions.is_empty() {
        lines.push("  No transitions recorded".to_string());
    }
    for t in &detail.transitions {
        lines.push(format!(
            "  {}  {} -> {}  by {}",
            ts(t.transitioned_at.as_ref()),
            or_absent(t.from_state),
            t.to_state,
            or_absent(t.transitioned_by.as_deref())
        ));
        if let Some(notes) = &t.notes {
            lines.push(format!("      {}", notes));
        }
    }

    lines.join("\n")
}

/// One violation line: severity, annotated rule code and message.
pub fn violation(v: &Violation, rules: &RuleRegistry) -> String {
    let mut line = format!("[{}] {}", or_absent(v.severity), rules.annotate(&v.rule_code));
    if let Some(message) = &v.message {
        line.push_str(&format!("\n      {}", message));
    }
    line
}

/// Impact simulation result.
pub fn simulation(result: &SimulationResult, rules: &RuleRegistry) -> String {
    let delta = &result.risk_delta;
    let mut lines = vec![format!(
        "Impact Simulation ({})",
        or_absent(result.simulated_event_type.as_deref())
    )];
    lines.push(String::new());

    let was = match delta.current_outcome {
        Some(current) if delta.outcome_changed => format!("was {} (changed)", current),
        Some(current) => format!("was {}", current),
        None => "no prior evaluation".to_string(),
    };
    lines.push(stat(
        "Predicted",
        format!("{}  {}", result.predicted_outcome, was),
    ));
    lines.push(stat("Critical delta", signed(delta.critical_delta)));
    lines.push(stat("Warning delta", signed(delta.warning_delta)));

    lines.push(String::new());
    lines.push(format!(
        "Predicted Violations ({})",
        result.predicted_violations.len()
    ));
    if result.predicted_violations.is_empty() {
        lines.push("  No violations predicted.".to_string());
    }
    for v in &result.predicted_violations {
        lines.push(format!("  {}", violation(v, rules)));
    }

    if !result.affected_downstream_system_ids.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Affected Downstream ({})",
            result.affected_downstream_system_ids.len()
        ));
        let ids: Vec<String> = result
            .affected_downstream_system_ids
            .iter()
            .map(|id| short_id(id))
            .collect();
        lines.push(format!("  {}", ids.join("  ")));
    }

    lines.join("\n")
}

// =============================================================================
// Trace
// =============================================================================

/// Governance trace events.
pub fn trace(events: &[TraceEvent]) -> String {
    if events.is_empty() {
        return "No trace events".to_string();
    }

    let mut lines = Vec::new();
    for event in events {
        lines.push(format!(
            "{}  {}  {}",
            ts(event.timestamp.as_ref()),
            event.title,
            event.id
        ));
        if let Some(message) = &event.message {
            lines.push(format!("    {}", message));
        }
    }
    lines.join("\n")
}

// =============================================================================
// Rules
// =============================================================================

/// The rule catalog in declaration order.
pub fn rules_catalog(rules: &RuleRegistry) -> String {
    if rules.is_empty() {
        return "No rules registered".to_string();
    }

    let rows: Vec<Vec<String>> = rules
        .iter()
        .map(|r| {
            vec![
                r.code.to_string(),
                r.domain.to_string(),
                r.introduced_in_policy_version.to_string(),
                r.description.to_string(),
            ]
        })
        .collect();

    let mut lines = table(&["CODE", "DOMAIN", "SINCE", "DESCRIPTION"], &rows);
    lines.push(String::new());
    lines.push(format!(
        "{} · policy version {}",
        plural(rules.len() as u64, "rule"),
        POLICY_VERSION
    ));
    lines.join("\n")
}

/// One rule's full metadata.
pub fn rule_detail(rule: &RuleMetadata) -> String {
    [
        rule.code.to_string(),
        String::new(),
        stat("Domain", rule.domain),
        stat("Description", rule.description),
        stat("Document", rule.document_reference),
        stat("Since policy", rule.introduced_in_policy_version),
    ]
    .join("\n")
}
