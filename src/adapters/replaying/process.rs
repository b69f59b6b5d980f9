//! Replaying adapter for the `ProcessRunner` port.

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::process::{Invocation, ProcessOutput, ProcessRunner};

/// Replays recorded process results from a cassette.
///
/// Outputs are served in recording order regardless of the invocation passed
/// in, so a cassette recorded against the real binaries reproduces the same
/// responses without them installed.
pub struct ReplayingProcessRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessRunner {
    /// Creates a new replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessRunner for ReplayingProcessRunner {
    fn run(
        &self,
        _invocation: &Invocation,
    ) -> Result<ProcessOutput, Box<dyn std::error::Error + Send + Sync>> {
        let output = {
            let mut replayer = self.replayer.lock().map_err(|_| "replayer lock poisoned")?;
            // Never panic while holding the lock.
            if replayer.remaining("process", "run") == 0 {
                return Err("cassette exhausted: no recorded process::run left".into());
            }
            let interaction = replayer.next_interaction("process", "run");
            interaction.output.clone()
        };
        if let Some(err) = output.get("Err") {
            let msg = err.as_str().unwrap_or("unknown error").to_string();
            return Err(msg.into());
        }
        let value = output.get("Ok").unwrap_or(&output);
        let exit_code = value.get("exit_code").and_then(serde_json::Value::as_i64).unwrap_or(0);
        let stdout =
            value.get("stdout").and_then(serde_json::Value::as_str).unwrap_or("").to_string();
        let stderr =
            value.get("stderr").and_then(serde_json::Value::as_str).unwrap_or("").to_string();
        Ok(ProcessOutput { exit_code: i32::try_from(exit_code).unwrap_or(1), stdout, stderr })
    }
}
