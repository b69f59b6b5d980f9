//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `llamagate`.
#[derive(Debug, Parser)]
#[command(
    name = "llamagate",
    version,
    about = "OpenAI-compatible completions backed by a local llama-cli"
)]
pub struct Cli {
    /// The command to execute. Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Supported top-level subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Download the model, then serve completions on port 8000.
    Serve,
    /// Download the model and exit.
    Provision,
}

impl Cli {
    /// The selected command, falling back to `serve`.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
