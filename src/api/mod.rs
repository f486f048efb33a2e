//! api
//!
//! Client for the internal governance API.
//!
//! # Architecture
//!
//! The [`GovernanceApi`] trait defines every call the CLI makes. Commands take
//! `&dyn GovernanceApi` and never name a concrete client, so the same code
//! runs against the backend through [`HttpApi`] and against [`mock::MockApi`]
//! in tests.
//!
//! The backend is authoritative for governance state. Nothing here caches
//! results or decides whether a transition is legal; the action lists on
//! [`AmendmentState`] only shape what the CLI offers.
//!
//! # Modules
//!
//! - `traits`: the trait, errors and request types
//! - `types`: response resources
//! - [`client`]: reqwest implementation
//! - [`mock`]: in-memory implementation for deterministic testing

pub mod client;
pub mod mock;
mod traits;
mod types;

pub use client::{HttpApi, HttpApiBuilder};
pub use traits::*;
pub use types::*;
