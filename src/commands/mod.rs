//! Command dispatch and handlers.

pub mod provision;
pub mod serve;

use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;

/// Environment variable naming a cassette file to record subprocess calls into.
pub const RECORD_VAR: &str = "LLAMAGATE_RECORD";
/// Environment variable naming a cassette file to replay subprocess calls from.
pub const REPLAY_VAR: &str = "LLAMAGATE_REPLAY";

/// Dispatch a parsed command to its handler.
///
/// The configuration is resolved first, so a missing credential fails the
/// process before any subprocess runs or any port is bound.
///
/// When `LLAMAGATE_RECORD` is set to a file path, every subprocess
/// interaction is recorded there. When `LLAMAGATE_REPLAY` is set, recorded
/// results are served instead of running real programs.
///
/// # Errors
///
/// Returns an error string if configuration fails or the handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| format!("Failed to load model: {e}"))?;
    let ctx = context_from_env(&config)?;

    let result = dispatch_with_context(command, &ctx, config);

    // Finish recording after command completes (even on error)
    if let Some(path) = ctx.finish()? {
        info!(path = %path.display(), "recording saved");
    }

    result
}

/// Picks live, recording, or replaying adapters from the environment.
fn context_from_env(config: &Config) -> Result<ServiceContext, String> {
    if let Ok(path) = env::var(REPLAY_VAR) {
        info!(cassette = %path, "replaying subprocess results");
        return ServiceContext::replaying(&PathBuf::from(path));
    }
    if let Ok(path) = env::var(RECORD_VAR) {
        info!(cassette = %path, "recording subprocess calls");
        return Ok(ServiceContext::recording_at(PathBuf::from(path), &config.model_name));
    }
    Ok(ServiceContext::live())
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: Config,
) -> Result<(), String> {
    match command {
        Command::Serve => serve::run(ctx, config),
        Command::Provision => provision::run(ctx, &config),
    }
}
