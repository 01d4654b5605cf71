//! CLI module for Dashgrid.
//!
//! The CLI plays the part of a host screen: it loads the configured layout,
//! runs drags and resizes through the layout actor, and prints the result.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::DashgridError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), DashgridError> {
    let cli = Cli::parse();
    cli.execute()
}
