//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each network command has two halves:
//! 1. A synchronous entry point that builds the HTTP client from the
//!    [`Context`], runs the async half on a tokio runtime and prints the result
//! 2. An async `*_report` function that takes `&dyn GovernanceApi` and
//!    returns the finished text (or JSON) without printing
//!
//! The report functions are what the tests drive, with [`crate::api::mock::MockApi`]
//! standing in for the backend.
//!
//! [`Context`]: super::Context

mod amendments;
mod completion;
mod config_cmd;
mod estate;
mod rules;
mod systems;
mod trace;

// Re-export command functions for testing and direct invocation
pub use amendments::{
    list as amendments_list, list_report as amendments_list_report, show as amendments_show,
    show_report as amendments_show_report, simulate, simulate_report, transition,
    transition_report,
};
pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show, show_report as config_report};
pub use estate::{estate, estate_report};
pub use rules::{
    list as rules_list, list_report as rules_list_report, show as rules_show,
    show_report as rules_show_report,
};
pub use systems::{
    list as systems_list, list_report as systems_list_report, show as systems_show,
    show_report as systems_show_report,
};
pub use trace::{trace, trace_report};

use super::args::{AmendmentsAction, Command, ConfigAction, RulesAction, SystemsAction};
use super::Context;
use crate::api::AmendmentAction;
use crate::ui::output;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Estate => estate::estate(ctx),

        Command::Systems { action } => match action {
            SystemsAction::List => systems::list(ctx),
            SystemsAction::Show { id, tab, page } => systems::show(ctx, &id, tab, page),
        },

        Command::Amendments { action } => match action {
            AmendmentsAction::List { state, page } => {
                amendments::list(ctx, state.map(Into::into), page)
            }
            AmendmentsAction::Show { id } => amendments::show(ctx, &id),
            AmendmentsAction::Simulate { id } => amendments::simulate(ctx, &id),
            AmendmentsAction::Approve(args) => {
                amendments::transition(ctx, AmendmentAction::Approve, &args)
            }
            AmendmentsAction::Reject(args) => {
                amendments::transition(ctx, AmendmentAction::Reject, &args)
            }
            AmendmentsAction::Execute(args) => {
                amendments::transition(ctx, AmendmentAction::Execute, &args)
            }
        },

        Command::Trace => trace::trace(ctx),

        Command::Rules { action } => match action {
            RulesAction::List => rules::list(ctx),
            RulesAction::Show { code } => rules::show(ctx, &code),
        },

        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
        },

        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Print a finished report.
///
/// JSON documents are printed even in quiet mode; the caller asked for them.
fn emit(ctx: &Context, report: String) {
    if ctx.json {
        println!("{}", report);
    } else {
        output::print(report, ctx.verbosity);
    }
}

/// Run an async report on a fresh runtime and print it.
fn run_report<F>(ctx: &Context, report: F) -> Result<()>
where
    F: std::future::Future<Output = Result<String>>,
{
    let rt = tokio::runtime::Runtime::new()?;
    let text = rt.block_on(report)?;
    emit(ctx, text);
    Ok(())
}
