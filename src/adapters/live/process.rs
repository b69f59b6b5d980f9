//! Live process runner using `std::process::Command`.

use std::process::{Command, Stdio};

use crate::ports::process::{Invocation, ProcessOutput, ProcessRunner};

/// Runs invocations as real child processes.
///
/// The child inherits the parent's environment plus the invocation's extra
/// variables. Stdin is closed so interactive tools cannot block on it.
pub struct LiveProcessRunner;

impl ProcessRunner for LiveProcessRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<ProcessOutput, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .output()?;
        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
