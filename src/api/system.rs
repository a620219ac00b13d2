use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AppState, StatusResponse};

/// `GET /health`
///
/// Reports whether the database answers a trivial query.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store().ping().await {
        Ok(()) => Json(StatusResponse { status: "ok" }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse {
                    status: "db_unavailable",
                }),
            )
                .into_response()
        }
    }
}
