//! HTTP query service.
//!
//! Exposes `GET /api/health` and `POST /api/search` over axum. The search
//! handler runs the `SearchAnswerer` pipeline and collapses every failure into
//! one generic 500 response.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::answerer::SearchAnswerer;

mod routes;

pub use routes::{ERROR_KIND_HEADER, GENERIC_ERROR_MESSAGE, router};

/// Serves the query service on an already-bound listener until `shutdown`
/// resolves.
///
/// # Errors
///
/// Returns an error if the listener fails while accepting connections.
pub async fn serve<F>(
    listener: TcpListener,
    answerer: Arc<SearchAnswerer>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(answerer);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("query service failed")
}

/// Entry point for `rag-search serve`.
///
/// Builds the provider pipeline from the environment, binds `bind` (any
/// `host:port`, e.g. `127.0.0.1:5000` or `localhost:5000`) and serves until
/// Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if:
/// - A provider is misconfigured (e.g. missing API key)
/// - The tokio runtime cannot be created
/// - The address cannot be bound
pub fn run(bind: &str) -> Result<()> {
    let answerer = SearchAnswerer::from_env().context("failed to configure providers")?;
    let answerer = Arc::new(answerer);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(bind)
            .await
            .with_context(|| format!("failed to bind {bind}"))?;
        let local_addr = listener
            .local_addr()
            .context("failed to read bound address")?;

        info!("query service listening on http://{}", local_addr);
        serve(listener, answerer, shutdown_signal()).await?;
        info!("query service stopped");
        Ok::<_, anyhow::Error>(())
    })
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
