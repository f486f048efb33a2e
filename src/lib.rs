//! Vidar - terminal console for an internal governance dashboard
//!
//! Vidar renders the dashboard's views (estate health, systems, amendments,
//! governance trace) from the internal governance API, lets operators
//! approve, reject and execute amendments, and runs what-if impact
//! simulations. Rule codes in every view are annotated from a built-in,
//! immutable rule metadata registry.
//!
//! # Architecture
//!
//! - [`rules`] - Immutable rule metadata registry (the library's core)
//! - [`api`] - Governance API trait, HTTP client and in-memory mock
//! - [`config`] - Configuration file, environment overrides, precedence
//! - [`ui`] - Rendering, output and prompts
//! - [`cli`] - Command-line interface layer
//! - [`logging`] - Diagnostic logging setup
//!
//! # Invariants
//!
//! 1. The backend is authoritative: nothing here evaluates rules or decides
//!    whether an amendment transition is legal
//! 2. The rule registry is metadata only and cannot be mutated after
//!    construction
//! 3. No credential is compiled in; the proxy token is runtime configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod rules;
pub mod ui;
