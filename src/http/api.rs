//! Axum handlers for `/api/*` routes.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use super::ApiState;
use crate::fallback::QueryError;

#[derive(Deserialize)]
pub(super) struct QueryRequest {
    /// Missing and `null` are both treated like an empty query.
    #[serde(default)]
    query: Option<String>,
}

fn json_error(status: StatusCode, msg: impl std::fmt::Display) -> Response {
    (status, Json(json!({ "error": msg.to_string() }))).into_response()
}

/// POST /api/query
pub(super) async fn query(
    State(state): State<ApiState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(req) => req,
        Err(rejection) => return json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let span = info_span!("query", request_id = %Uuid::new_v4());
    async move {
        match state.controller.answer(req.query.as_deref().unwrap_or("")).await {
            Ok(answer) => (
                StatusCode::OK,
                Json(json!({
                    "answer": answer.display_text(),
                    "source": answer.provenance.as_str(),
                })),
            )
                .into_response(),
            Err(e) => {
                let status = match &e {
                    QueryError::EmptyQuery => StatusCode::BAD_REQUEST,
                    QueryError::NoDataSource => StatusCode::INTERNAL_SERVER_ERROR,
                    QueryError::ProvidersFailed(_) => StatusCode::BAD_GATEWAY,
                };
                if !e.is_client_error() {
                    warn!(error = %e, "query failed");
                }
                json_error(status, e)
            }
        }
    }
    .instrument(span)
    .await
}

/// GET /api/status
pub(super) async fn status(State(state): State<ApiState>) -> Response {
    (StatusCode::OK, Json(state.controller.status().await)).into_response()
}

/// POST /api/graph/reload. A failed reload keeps the current snapshot.
pub(super) async fn reload_graph(State(state): State<ApiState>) -> Response {
    match state.controller.graph().reload().await {
        Ok(graph) => (
            StatusCode::OK,
            Json(json!({ "nodes": graph.node_count(), "edges": graph.edge_count() })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "graph reload failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
