//! rules::catalog
//!
//! Built-in rule metadata.
//!
//! Append-only: new rules go at the end. Reordering existing entries changes
//! the listing order consumers see. Fields are literals, never computed.

use super::registry::RuleMetadata;

/// Policy version the built-in catalog is aligned to. Display only.
pub const POLICY_VERSION: &str = "1.0.0";

const DOMAIN: &str = "governance";
const DOCUMENT: &str = "Canonical Governance Rules";
const DESCRIPTION: &str = "Metadata-only registry entry for authoritative governance rule.";

const fn rule(code: &'static str) -> RuleMetadata {
    RuleMetadata {
        code,
        domain: DOMAIN,
        description: DESCRIPTION,
        document_reference: DOCUMENT,
        introduced_in_policy_version: "1.0.0",
    }
}

/// The canonical data set, in authoritative list order.
pub const BUILTIN_RULES: &[RuleMetadata] = &[
    rule("SOVR-001"),
    rule("SOVR-002"),
    rule("SOVR-003"),
    rule("SOVR-004"),
    rule("COMP-001"),
    rule("CINT-001"),
    rule("CINT-002"),
    rule("CINT-003"),
    rule("SUBS-001"),
    rule("INTF-001"),
    rule("PROD-001"),
    rule("PROD-002"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = BUILTIN_RULES.iter().map(|r| r.code).collect();
        assert_eq!(codes.len(), BUILTIN_RULES.len());
    }

    #[test]
    fn declared_order_is_stable() {
        let codes: Vec<_> = BUILTIN_RULES.iter().map(|r| r.code).collect();
        assert_eq!(
            codes,
            vec![
                "SOVR-001", "SOVR-002", "SOVR-003", "SOVR-004", "COMP-001", "CINT-001",
                "CINT-002", "CINT-003", "SUBS-001", "INTF-001", "PROD-001", "PROD-002",
            ]
        );
    }

    #[test]
    fn descriptions_are_non_empty() {
        assert!(BUILTIN_RULES.iter().all(|r| !r.description.is_empty()));
    }

    #[test]
    fn no_entry_newer_than_policy_version() {
        // Versions are plain x.y.z literals; compare numerically.
        fn parse(v: &str) -> Vec<u32> {
            v.split('.').map(|p| p.parse().unwrap()).collect()
        }
        let policy = parse(POLICY_VERSION);
        for rule in BUILTIN_RULES {
            assert!(
                parse(rule.introduced_in_policy_version) <= policy,
                "{} introduced after current policy",
                rule.code
            );
        }
    }
}
