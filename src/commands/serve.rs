//! `llamagate serve` command: provision, then serve completions.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::Error;

/// Provision the model, then serve `POST /v1/completions` until Ctrl-C.
///
/// Provisioning happens before the listener is bound; if it fails the port is
/// never opened.
///
/// # Errors
///
/// Returns an error string if provisioning fails, the runtime cannot start,
/// the port cannot be bound, or the server stops with an error.
pub fn run(ctx: &ServiceContext, config: Config) -> Result<(), String> {
    crate::provision::provision(ctx.runner.as_ref(), &config)
        .map_err(|e| format!("Failed to load model: {e}"))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e).to_string())?;

    let state = AppState::new(config.clone(), Arc::clone(&ctx.runner));
    runtime
        .block_on(async move {
            let addr = config.bind_addr;
            let listener =
                TcpListener::bind(addr).await.map_err(|source| Error::Bind { addr, source })?;
            info!(port = addr.port(), "starting OpenAI-compatible API");
            api::serve(listener, state, shutdown_signal()).await
        })
        .map_err(|e| e.to_string())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
