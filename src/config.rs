//! Runtime configuration.
//!
//! Everything except the download credential is fixed at build time. The
//! credential comes from the process environment, after `.env` has been
//! loaded by the binary entrypoint.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable holding the Hugging Face access token.
pub const TOKEN_VAR: &str = "HUGGINGFACE_TOKEN";
/// Environment variable the downloader reads the token from.
pub const DOWNLOADER_TOKEN_VAR: &str = "HF_TOKEN";
/// Repository id of the model that is provisioned and served.
pub const MODEL_NAME: &str = "afrideva/Tiny-Vicuna-1B-GGUF";
/// Weight file inside the model directory passed to the inference binary.
pub const MODEL_FILE: &str = "tiny-vicuna-1b.q2_k.gguf";
/// Root directory that downloaded models are placed under.
pub const MODELS_DIR: &str = "./models";
/// Model download command-line tool.
pub const DOWNLOAD_PROGRAM: &str = "huggingface-cli";
/// Text generation command-line tool.
pub const INFERENCE_PROGRAM: &str = "llama-cli";
/// Sampling temperature passed on every inference call.
pub const TEMPERATURE: &str = "0.7";
/// Output-length cap passed on every inference call.
pub const MAX_NEW_TOKENS: u32 = 256;
/// Listening port.
pub const PORT: u16 = 8000;

/// Resolved configuration for one process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Model repository id to download and serve.
    pub model_name: String,
    /// Download credential.
    pub hf_token: String,
    /// Root directory for downloaded models.
    pub models_dir: PathBuf,
    /// Weight file name inside the model directory.
    pub model_file: String,
    /// Downloader executable.
    pub download_program: String,
    /// Inference executable.
    pub inference_program: String,
    /// Temperature argument, passed through as text.
    pub temperature: String,
    /// Maximum number of tokens the inference binary may generate.
    pub max_new_tokens: u32,
    /// Socket address the HTTP server binds.
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the token variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration using `lookup` to read environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the token variable is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hf_token = lookup(TOKEN_VAR)
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingCredential { var: TOKEN_VAR })?;
        Ok(Self::with_token(hf_token))
    }

    /// Builds the fixed configuration around an already-known credential.
    #[must_use]
    pub fn with_token(hf_token: impl Into<String>) -> Self {
        Self {
            model_name: MODEL_NAME.to_string(),
            hf_token: hf_token.into(),
            models_dir: PathBuf::from(MODELS_DIR),
            model_file: MODEL_FILE.to_string(),
            download_program: DOWNLOAD_PROGRAM.to_string(),
            inference_program: INFERENCE_PROGRAM.to_string(),
            temperature: TEMPERATURE.to_string(),
            max_new_tokens: MAX_NEW_TOKENS,
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, PORT)),
        }
    }

    /// Directory the model is downloaded into, `<models_dir>/<model_name>`.
    #[must_use]
    pub fn model_dir(&self) -> PathBuf {
        self.models_dir.join(&self.model_name)
    }

    /// Full path of the weight file handed to the inference binary.
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join(&self.model_file)
    }
}
