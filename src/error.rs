//! Error type shared by provisioning, inference, and serving.

use thiserror::Error;

/// Errors raised while provisioning a model or serving completions.
#[derive(Debug, Error)]
pub enum Error {
    /// The download credential is missing or empty.
    #[error("{var} is not set")]
    MissingCredential {
        /// Name of the environment variable that was expected.
        var: &'static str,
    },
    /// An external program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying error from the process runner.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The model downloader exited unsuccessfully.
    #[error("model download exited with status {exit_code}")]
    DownloadFailed {
        /// Exit code of the downloader.
        exit_code: i32,
        /// Combined stdout and stderr.
        output: String,
    },
    /// The inference binary exited unsuccessfully.
    #[error("text generation exited with status {exit_code}")]
    GenerationFailed {
        /// Exit code of the inference binary.
        exit_code: i32,
        /// Combined stdout and stderr.
        output: String,
    },
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: std::net::SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    /// The async runtime could not be created.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        let err = Error::MissingCredential { var: "HUGGINGFACE_TOKEN" };
        assert_eq!(err.to_string(), "HUGGINGFACE_TOKEN is not set");
    }

    #[test]
    fn failure_messages_do_not_embed_process_output() {
        let err = Error::GenerationFailed { exit_code: 1, output: "secret model path".into() };
        assert_eq!(err.to_string(), "text generation exited with status 1");
    }
}
