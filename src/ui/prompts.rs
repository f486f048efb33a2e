//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have been confirmed up front
//! (`--yes`) or fail with a clear error message.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Prompt for confirmation (yes/no) on the terminal.
///
/// Returns `Ok(true)` if the user confirms, `Ok(false)` if they decline.
/// Returns `Err(PromptError::NotInteractive)` if not in interactive mode.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout, message, default)
}

/// Prompt for confirmation using the given input and output streams.
///
/// An empty answer takes `default`. End of input counts as cancellation.
pub fn confirm_with<R, W>(
    input: &mut R,
    output: &mut W,
    message: &str,
    default: bool,
) -> Result<bool, PromptError>
where
    R: BufRead,
    W: Write,
{
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    write!(output, "{} {} ", message, hint).map_err(|e| PromptError::IoError(e.to_string()))?;
    output
        .flush()
        .map_err(|e| PromptError::IoError(e.to_string()))?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .map_err(|e| PromptError::IoError(e.to_string()))?;
    if read == 0 {
        return Err(PromptError::Cancelled);
    }

    match answer.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "y" | "yes" => Ok(true),
        _ => Ok(false),
    }
}
