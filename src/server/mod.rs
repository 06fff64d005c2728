//! HTTP layer: router, shared state, and serving.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::AppConfig;
use crate::extractor::MediaExtractor;
use crate::store::DownloadStore;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: DownloadStore,
    pub extractor: Arc<dyn MediaExtractor>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/fetch-video", post(handlers::fetch_video))
        .route("/api/download-video", post(handlers::download_video))
        .route("/api/cleanup", post(handlers::cleanup))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let addr = state.config.listen_addr();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "vidgrab listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
