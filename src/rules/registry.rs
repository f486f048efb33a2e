//! rules::registry
//!
//! The rule metadata registry.
//!
//! # Invariants
//!
//! - Codes are unique. When the input repeats a code, the first occurrence is
//!   kept and later ones are dropped without error.
//! - Listing order is construction order.
//! - No method takes `&mut self`; after construction the registry cannot be
//!   changed, and everything it hands out is a shared borrow.
//! - Lookups and listings depend only on the data the registry was built
//!   from.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::catalog::BUILTIN_RULES;

/// Descriptive metadata for one governance rule.
///
/// No field affects evaluation. The `code` matches the `rule_code` strings
/// the backend engine puts in violation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RuleMetadata {
    /// Stable rule identifier, e.g. `SOVR-001`.
    pub code: &'static str,
    /// Coarse grouping for display.
    pub domain: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Citation of the authoritative source document.
    pub document_reference: &'static str,
    /// Policy version that introduced the rule.
    pub introduced_in_policy_version: &'static str,
}

/// Ordered, immutable mapping from rule code to [`RuleMetadata`].
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    entries: Vec<RuleMetadata>,
    index: HashMap<&'static str, usize>,
}

impl RuleRegistry {
    /// Build a registry from entries in declaration order.
    ///
    /// Duplicate codes keep their first occurrence.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RuleMetadata>,
    {
        let mut list = Vec::new();
        let mut index = HashMap::new();

        for entry in entries {
            if index.contains_key(entry.code) {
                continue;
            }
            index.insert(entry.code, list.len());
            list.push(entry);
        }

        Self {
            entries: list,
            index,
        }
    }

    /// Build the registry from the catalog shipped with this build.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_RULES.iter().copied())
    }

    /// Look up metadata for a rule code.
    ///
    /// Unknown codes return `None`; that is an expected outcome, not an error.
    pub fn get(&self, code: &str) -> Option<&RuleMetadata> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    /// All entries in construction order.
    pub fn list(&self) -> &[RuleMetadata] {
        &self.entries
    }

    /// Iterate entries in construction order.
    pub fn iter(&self) -> std::slice::Iter<'_, RuleMetadata> {
        self.entries.iter()
    }

    /// Whether the registry knows `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pair a rule code with whatever metadata the registry has for it.
    ///
    /// The returned label displays as the bare code for unknown rules.
    pub fn annotate<'a>(&'a self, code: &'a str) -> RuleLabel<'a> {
        RuleLabel {
            code,
            metadata: self.get(code),
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a RuleRegistry {
    type Item = &'a RuleMetadata;
    type IntoIter = std::slice::Iter<'a, RuleMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A rule code ready for display, with optional registry context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleLabel<'a> {
    /// The code as reported by the backend.
    pub code: &'a str,
    /// Registry metadata, if the code is known.
    pub metadata: Option<&'a RuleMetadata>,
}

impl RuleLabel<'_> {
    /// Whether the registry knew this code.
    pub fn is_known(&self) -> bool {
        self.metadata.is_some()
    }
}

impl fmt::Display for RuleLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.metadata {
            Some(meta) => write!(
                f,
                "{} ({}) {} [{}, since {}]",
                self.code,
                meta.domain,
                meta.description,
                meta.document_reference,
                meta.introduced_in_policy_version
            ),
            None => f.write_str(self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &'static str, description: &'static str) -> RuleMetadata {
        RuleMetadata {
            code,
            domain: "governance",
            description,
            document_reference: "Doc",
            introduced_in_policy_version: "1.0.0",
        }
    }

    #[test]
    fn single_entry_lookup() {
        let e = entry("SOVR-001", "D1");
        let reg = RuleRegistry::from_entries([e]);

        assert_eq!(reg.get("SOVR-001").unwrap().description, "D1");
        assert!(reg.get("SOVR-002").is_none());
        assert_eq!(reg.list(), &[e]);
    }

    #[test]
    fn duplicate_keeps_first() {
        let reg = RuleRegistry::from_entries([
            entry("SOVR-001", "first"),
            entry("SOVR-002", "other"),
            entry("SOVR-001", "second"),
        ]);

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("SOVR-001").unwrap().description, "first");
        let codes: Vec<_> = reg.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["SOVR-001", "SOVR-002"]);
    }

    #[test]
    fn every_listed_entry_round_trips_through_get() {
        let reg = RuleRegistry::builtin();
        for e in reg.list() {
            assert_eq!(reg.get(e.code), Some(e));
        }
    }

    #[test]
    fn builtin_matches_catalog_order() {
        let reg = RuleRegistry::builtin();
        assert_eq!(reg.list(), BUILTIN_RULES);
        assert_eq!(reg.len(), 12);
        assert!(!reg.is_empty());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let reg = RuleRegistry::builtin();
        let first: Vec<RuleMetadata> = reg.list().to_vec();
        for _ in 0..3 {
            assert_eq!(reg.list(), first.as_slice());
            assert_eq!(reg.get("PROD-002"), reg.get("PROD-002"));
        }
    }

    #[test]
    fn mutating_a_listed_copy_is_not_observed() {
        let reg = RuleRegistry::builtin();
        let mut copy = reg.list().to_vec();
        copy[0].description = "tampered";
        copy.clear();

        assert_eq!(reg.list()[0].description, BUILTIN_RULES[0].description);
        assert_eq!(reg.len(), BUILTIN_RULES.len());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let reg = RuleRegistry::builtin();
        assert!(reg.get("sovr-001").is_none());
        assert!(reg.get("").is_none());
    }

    #[test]
    fn empty_registry() {
        let reg = RuleRegistry::from_entries(std::iter::empty());
        assert!(reg.is_empty());
        assert!(reg.list().is_empty());
        assert!(reg.get("SOVR-001").is_none());
    }

    #[test]
    fn annotate_known_and_unknown() {
        let reg = RuleRegistry::from_entries([entry("SOVR-001", "D1")]);

        let known = reg.annotate("SOVR-001");
        assert!(known.is_known());
        assert_eq!(known.to_string(), "SOVR-001 (governance) D1 [Doc, since 1.0.0]");

        let unknown = reg.annotate("ZZZZ-404");
        assert!(!unknown.is_known());
        assert_eq!(unknown.to_string(), "ZZZZ-404");
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleRegistry>();

        let reg = std::sync::Arc::new(RuleRegistry::builtin());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reg = reg.clone();
                std::thread::spawn(move || reg.get("CINT-002").map(|r| r.code))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Some("CINT-002"));
        }
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let json = serde_json::to_value(entry("SOVR-001", "D1")).unwrap();
        assert_eq!(json["document_reference"], "Doc");
        assert_eq!(json["introduced_in_policy_version"], "1.0.0");
    }
}
