//! Service context bundling the port implementations for one run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::LiveProcessRunner;
use crate::adapters::recording::RecordingProcessRunner;
use crate::adapters::replaying::ReplayingProcessRunner;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::process::ProcessRunner;

/// Bundles the process runner with an optional cassette recorder.
///
/// Constructors wire up different adapter implementations (live, replaying,
/// recording).
pub struct ServiceContext {
    /// Runner used for both the download and every inference call.
    pub runner: Arc<dyn ProcessRunner>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context that spawns real child processes.
    #[must_use]
    pub fn live() -> Self {
        Self { runner: Arc::new(LiveProcessRunner), recorder: None }
    }

    /// Creates a recording context that captures every subprocess call.
    ///
    /// Uses the live runner for actual work. The cassette is written to `path`
    /// by [`ServiceContext::finish`].
    #[must_use]
    pub fn recording_at(path: PathBuf, model: &str) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "llamagate-session", model)));
        let runner = RecordingProcessRunner::new(Box::new(LiveProcessRunner), Arc::clone(&recorder));
        Self { runner: Arc::new(runner), recorder: Some(recorder) }
    }

    /// Creates a context that replays subprocess results from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        let runner = ReplayingProcessRunner::new(CassetteReplayer::new(&cassette));
        Ok(Self { runner: Arc::new(runner), recorder: None })
    }

    /// Ends the run, writing the cassette if this context was recording.
    ///
    /// Returns the cassette path when one was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let Some(recorder) = self.recorder else {
            return Ok(None);
        };
        // The runner holds the other reference to the recorder.
        drop(self.runner);
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| "cassette recorder is still in use".to_string())?
            .into_inner()
            .map_err(|_| "cassette recorder lock poisoned".to_string())?;
        if recorder.is_empty() {
            warn!("no subprocess interactions were recorded");
        } else {
            info!(interactions = recorder.len(), "writing cassette");
        }
        recorder.finish().map(Some).map_err(|e| format!("Failed to write cassette: {e}"))
    }
}
