//! cli
//!
//! Command-line interface layer for vidar.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and build the rule registry once per invocation
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, assembles a
//! [`Context`] and dispatches to [`commands`]. Governance state lives in the
//! backend; handlers only fetch, render and forward operator actions.

pub mod args;
pub mod commands;
mod context;

pub use args::{Cli, Shell};
pub use context::Context;

use crate::config::{schema, Config};
use crate::rules::RuleRegistry;
use crate::ui::output::Verbosity;
use anyhow::{Context as _, Result};

/// Run the CLI application with already-parsed arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()
        .context("Failed to load configuration")?
        .config;

    if let Some(url) = &cli.backend_url {
        schema::validate_backend_url(url)?;
    }

    let ctx = Context {
        config,
        rules: RuleRegistry::builtin(),
        backend_url: cli.backend_url.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        interactive: cli.interactive(),
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}
