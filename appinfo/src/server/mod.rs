//! HTTP listener serving snapshots as plain text
//!
//! Every request re-collects; the `keys` query parameter narrows the
//! result the same way CLI filters do.

pub mod handlers;
pub mod state;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::collector::Collector;
use state::AppState;

/// Configuration for the HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Bind and serve until Ctrl+C
pub async fn serve(config: ServerConfig, collector: Collector) -> Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    serve_with_listener(listener, collector, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_with_listener<F>(listener: TcpListener, collector: Collector, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Serving diagnostics on http://{}", addr);

    let app = create_router(Arc::new(collector));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Create the router; any path answers with a snapshot
pub fn create_router(collector: Arc<Collector>) -> Router {
    Router::new()
        .route("/", get(handlers::snapshot))
        .fallback(get(handlers::snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(collector))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler, run until the process is killed.
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
