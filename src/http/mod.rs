//! Axum HTTP API.
//!
//! ## URL layout
//!
//! ```text
//! POST /api/query          {"query": "..."} → {"answer", "source"} | {"error"}
//! GET  /api/status         source availability snapshot
//! POST /api/graph/reload   re-read the graph source and swap the snapshot
//! GET  /favicon.ico        → 204
//! ```
//!
//! [`serve`] drives the axum event loop; the [`CancellationToken`] is wired
//! to axum's graceful shutdown.

mod api;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;
use crate::fallback::FallbackController;

/// Router state injected into every handler.
///
/// Cheap to clone: the controller only holds reference-counted handles.
#[derive(Clone)]
pub(crate) struct ApiState {
    pub controller: FallbackController,
}

pub fn build_router(controller: FallbackController) -> Router {
    Router::new()
        .route("/api/query", post(api::query))
        .route("/api/status", get(api::status))
        .route("/api/graph/reload", post(api::reload_graph))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .with_state(ApiState { controller })
}

/// Bind `bind_addr` and serve until `shutdown` is cancelled.
pub async fn serve(
    bind_addr: &str,
    controller: FallbackController,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(controller);

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "http api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("axum server error: {e}")))?;

    info!("http api shut down");
    Ok(())
}
