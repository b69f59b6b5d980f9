//! Model provisioning via the external downloader.

use tracing::{error, info};

use crate::config::{Config, DOWNLOADER_TOKEN_VAR};
use crate::error::{Error, Result};
use crate::ports::{Invocation, ProcessRunner};

/// Builds `huggingface-cli download <model> --local-dir <models>/<model>`.
///
/// The credential travels in the child's environment, never on its command line.
#[must_use]
pub fn download_invocation(config: &Config) -> Invocation {
    Invocation::new(&config.download_program)
        .arg("download")
        .arg(&config.model_name)
        .arg("--local-dir")
        .arg(config.model_dir().to_string_lossy())
        .env(DOWNLOADER_TOKEN_VAR, &config.hf_token)
}

/// Downloads the configured model into the local models directory.
///
/// Runs once, blocking. There is no retry, no cleanup of a partial download,
/// and no integrity check of what was fetched.
///
/// # Errors
///
/// Returns [`Error::Spawn`] if the downloader cannot be started and
/// [`Error::DownloadFailed`] if it exits non-zero.
pub fn provision(runner: &dyn ProcessRunner, config: &Config) -> Result<()> {
    info!(model = %config.model_name, dir = %config.model_dir().display(), "downloading model");

    let invocation = download_invocation(config);
    let output = runner
        .run(&invocation)
        .map_err(|source| Error::Spawn { program: invocation.program.clone(), source })?;

    if !output.success() {
        let combined = output.combined();
        error!(exit_code = output.exit_code, output = %combined, "error downloading model");
        return Err(Error::DownloadFailed { exit_code: output.exit_code, output: combined });
    }

    info!(model = %config.model_name, "model downloaded successfully");
    Ok(())
}
