//! rules
//!
//! Metadata registry for governance rule codes.
//!
//! # Modules
//!
//! - [`registry`] - The immutable, ordered [`RuleRegistry`] and its entry type
//! - [`catalog`] - The built-in data set shipped with this build
//!
//! # Design
//!
//! The registry is metadata only. Rule evaluation happens in the backend
//! engine; nothing here scores, gates or enforces anything. Views use the
//! registry to put human-readable context next to a bare `rule_code` taken
//! from a violation record.
//!
//! The registry is a plain value. It is built once (usually via
//! [`RuleRegistry::builtin`]) and handed to whatever needs it, instead of
//! living in a process-wide global.
//!
//! # Example
//!
//! ```
//! use vidar::rules::RuleRegistry;
//!
//! let rules = RuleRegistry::builtin();
//! assert_eq!(rules.get("SOVR-001").unwrap().domain, "governance");
//! assert!(rules.get("NOPE-999").is_none());
//! assert_eq!(rules.list()[0].code, "SOVR-001");
//! ```

pub mod catalog;
pub mod registry;

pub use catalog::{BUILTIN_RULES, POLICY_VERSION};
pub use registry::{RuleLabel, RuleMetadata, RuleRegistry};
