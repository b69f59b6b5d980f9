//! Recording adapter for the `ProcessRunner` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Invocation, ProcessOutput, ProcessRunner};

/// Records process interactions while delegating to an inner implementation.
pub struct RecordingProcessRunner {
    inner: Box<dyn ProcessRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingProcessRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Box<dyn ProcessRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// What a cassette keeps of an invocation. Environment values can hold
/// credentials, so only their names are written.
#[derive(Serialize)]
struct RunInput<'a> {
    program: &'a str,
    args: &'a [String],
    env: Vec<&'a str>,
}

impl ProcessRunner for RecordingProcessRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<ProcessOutput, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.run(invocation);
        let input = RunInput {
            program: &invocation.program,
            args: &invocation.args,
            env: invocation.env.keys().map(String::as_str).collect(),
        };
        record_result(&self.recorder, "process", "run", &input, &result);
        result
    }
}
