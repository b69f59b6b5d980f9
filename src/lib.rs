//! Core library entry for the `llamagate` server.
//!
//! `llamagate` downloads a model with `huggingface-cli` once at startup and
//! then answers `POST /v1/completions` by running `llama-cli` on each prompt.

pub mod adapters;
pub mod api;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod inference;
pub mod ports;
pub mod provision;

pub use error::{Error, Result};

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command())
}

/// Install the stderr log subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let err = run(["llamagate", "unknown"]).unwrap_err();
        assert!(err.contains("unrecognized subcommand"));
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(run(["llamagate", "--help"]).is_ok());
    }

    #[test]
    fn init_logging_twice_is_harmless() {
        super::init_logging();
        super::init_logging();
    }
}
