//! `llamagate provision` command.

use crate::config::Config;
use crate::context::ServiceContext;

/// Download the configured model and exit.
///
/// # Errors
///
/// Returns an error string if the downloader cannot be run or fails.
pub fn run(ctx: &ServiceContext, config: &Config) -> Result<(), String> {
    crate::provision::provision(ctx.runner.as_ref(), config)
        .map_err(|e| format!("Failed to load model: {e}"))
}
