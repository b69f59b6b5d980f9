//! Process runner port for invoking external executables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single subprocess call: program, argument vector, and extra environment.
///
/// Arguments are passed to the program verbatim; nothing goes through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Executable name, resolved from `PATH`.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
    /// Variables added on top of the inherited environment.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), env: BTreeMap::new() }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds an environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// The captured result of a finished subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output followed by standard error.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Runs external executables to completion.
///
/// Both the model download and every inference call go through this trait,
/// so tests and cassette recording can substitute the live implementation.
pub trait ProcessRunner: Send + Sync {
    /// Runs the invocation, blocking until the child exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or waited on. A
    /// non-zero exit is not an error at this level.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<ProcessOutput, Box<dyn std::error::Error + Send + Sync>>;
}
