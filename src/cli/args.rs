//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--backend-url <URL>`: Backend origin, overriding config and environment
//! - `--debug`: Enable debug logging
//! - `--json`: Emit JSON instead of text views
//! - `--no-interactive`: Never prompt
//! - `--quiet` / `-q`: Minimal output

use std::io::IsTerminal;

use clap::{Parser, Subcommand};

use crate::api::AmendmentState;

/// Vidar - terminal console for the internal governance dashboard
#[derive(Parser, Debug)]
#[command(name = "vidar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend origin (default from config, then http://localhost:8001)
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit JSON instead of text views
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Interactive unless `--no-interactive`, `--quiet` or `--json` was set,
    /// and only when stdin is a terminal.
    pub fn interactive(&self) -> bool {
        if self.no_interactive || self.quiet || self.json {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show estate-wide governance health
    #[command(
        name = "estate",
        long_about = "Show estate-wide governance health.\n\n\
            Summarises how many systems are registered and active, how many were \
            evaluated in the last 30 days, how many received DENY or FLAG outcomes, \
            and how many carry advisory violations.",
        after_help = "\
EXAMPLES:
    vidar estate
    vidar estate --json"
    )]
    Estate,

    /// Browse systems and their governance posture
    #[command(name = "systems")]
    Systems {
        #[command(subcommand)]
        action: SystemsAction,
    },

    /// Review, simulate and transition amendments
    #[command(
        name = "amendments",
        long_about = "Review, simulate and transition amendments.\n\n\
            Amendments move through PROPOSED and UNDER_REVIEW to APPROVED and \
            EXECUTED, or end as REJECTED or WITHDRAWN. The backend decides whether a \
            transition is legal; vidar only offers the actions that make sense for \
            the current state.",
        after_help = "\
WORKFLOW EXAMPLES:
    # What is waiting for review?
    vidar amendments list --state under-review

    # Inspect one and check its impact
    vidar amendments show 41
    vidar amendments simulate 41

    # Approve, then execute
    vidar amendments approve 41 --actor alice --notes \"reviewed with ops\"
    vidar amendments execute 41 --actor alice"
    )]
    Amendments {
        #[command(subcommand)]
        action: AmendmentsAction,
    },

    /// Show governance trace events
    #[command(name = "trace")]
    Trace,

    /// Browse the rule metadata catalog (works offline)
    #[command(
        name = "rules",
        long_about = "Browse the rule metadata catalog.\n\n\
            The catalog is built into this binary and describes the rule codes that \
            appear in violation records. It is display metadata only; rules are \
            evaluated by the backend. No network access is needed."
    )]
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Inspect configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion.",
        after_help = "\
EXAMPLES:
    vidar completion bash >> ~/.bashrc
    vidar completion zsh >> ~/.zshrc
    vidar completion fish > ~/.config/fish/completions/vidar.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Systems subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SystemsAction {
    /// List all systems
    List,
    /// Show one system
    Show {
        /// System id
        id: String,

        /// Which view to show
        #[arg(long, value_enum, default_value_t = SystemTab::Risk)]
        tab: SystemTab,

        /// Page of the evaluation history (evals tab)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
}

/// Views of a single system
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTab {
    /// Risk summary
    Risk,
    /// Interfaces and components
    Map,
    /// Evaluation history
    Evals,
}

/// Amendments subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AmendmentsAction {
    /// List amendments
    List {
        /// Only amendments in this state
        #[arg(long, value_enum)]
        state: Option<AmendmentStateArg>,

        /// Page to show
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show one amendment
    Show {
        /// Amendment id
        id: String,
    },
    /// Predict the impact of executing an amendment
    Simulate {
        /// Amendment id
        id: String,
    },
    /// Approve an amendment
    Approve(TransitionArgs),
    /// Reject an amendment
    Reject(TransitionArgs),
    /// Execute an approved amendment
    Execute(TransitionArgs),
}

/// Arguments shared by the transition commands
#[derive(clap::Args, Debug, Clone)]
pub struct TransitionArgs {
    /// Amendment id
    pub id: String,

    /// Who is performing the action
    #[arg(long)]
    pub actor: String,

    /// Optional rationale
    #[arg(long)]
    pub notes: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Amendment state filter
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmendmentStateArg {
    Proposed,
    UnderReview,
    Approved,
    Executed,
    Rejected,
    Withdrawn,
}

impl From<AmendmentStateArg> for AmendmentState {
    fn from(arg: AmendmentStateArg) -> Self {
        match arg {
            AmendmentStateArg::Proposed => AmendmentState::Proposed,
            AmendmentStateArg::UnderReview => AmendmentState::UnderReview,
            AmendmentStateArg::Approved => AmendmentState::Approved,
            AmendmentStateArg::Executed => AmendmentState::Executed,
            AmendmentStateArg::Rejected => AmendmentState::Rejected,
            AmendmentStateArg::Withdrawn => AmendmentState::Withdrawn,
        }
    }
}

/// Rules subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RulesAction {
    /// List every rule in catalog order
    List,
    /// Show one rule
    Show {
        /// Rule code, e.g. SOVR-001
        code: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show effective configuration values and where they came from
    Show,
    /// Print the path of the loaded config file
    Path,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
