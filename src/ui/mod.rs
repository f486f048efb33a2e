//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing
//! - [`render`] - Text views of API resources and the rule catalog
//! - [`prompts`] - Interactive confirmations
//!
//! # Design
//!
//! All output and prompts go through this module so that quiet mode,
//! `--json` and non-interactive runs behave the same in every command.

pub mod output;
pub mod prompts;
pub mod render;
