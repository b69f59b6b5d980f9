//! HTTP surface: a single OpenAI-style completions route.
//!
//! ## Endpoints
//!
//! - `POST /v1/completions` - run the inference binary on `prompt`

pub mod types;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Error;
use crate::inference;
use crate::ports::ProcessRunner;

pub use types::{Choice, CompletionRequest, CompletionResponse, ErrorBody, Usage};

/// Error message returned for any unparseable request body.
pub const INVALID_REQUEST: &str = "Invalid request";
/// Error message returned for any inference failure.
pub const GENERATION_FAILED: &str = "Failed to generate text";

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    runner: Arc<dyn ProcessRunner>,
}

impl AppState {
    /// Creates state from a configuration and the runner used for inference.
    pub fn new(config: Config, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config: Arc::new(config), runner }
    }
}

/// Builds the router with all routes attached.
///
/// Every request, matched or not, gets one access log line.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/completions", post(completions))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Logs method, path, status, and latency once the response is ready.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request"
    );
    response
}

/// Serves the router on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`Error::Serve`] if the accept loop fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> crate::error::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown).await.map_err(Error::Serve)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message.to_string() })).into_response()
}

/// `POST /v1/completions`.
///
/// The body is parsed as JSON whatever its content type. Inference runs on
/// the blocking pool and is neither bounded nor cancelled if the client goes
/// away.
async fn completions(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(request) = CompletionRequest::from_slice(&body) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_REQUEST);
    };

    let runner = Arc::clone(&state.runner);
    let config = Arc::clone(&state.config);
    let prompt = request.prompt;
    let joined =
        tokio::task::spawn_blocking(move || inference::generate(runner.as_ref(), &config, &prompt))
            .await;

    match joined {
        Ok(Ok(text)) => (StatusCode::OK, Json(CompletionResponse::new(request.model, text)))
            .into_response(),
        Ok(Err(err)) => {
            match &err {
                Error::GenerationFailed { output, .. } => {
                    error!(error = %err, output = %output, "error generating text");
                }
                _ => error!(error = %err, "error generating text"),
            }
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
        Err(join_err) => {
            error!(error = %join_err, "inference task did not complete");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    }
}
