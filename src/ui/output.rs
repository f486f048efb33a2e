//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Report text goes to stdout; errors go to stderr. Quiet mode
//! suppresses everything except errors and JSON documents, which callers
//! asked for explicitly with `--json`.

use std::fmt::Display;

use serde::Serialize;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - standard output plus diagnostic logging
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. `quiet` wins over `debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Pretty-printed JSON document for `value`.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
