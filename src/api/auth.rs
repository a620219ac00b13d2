use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiJson, AppState};
use crate::services::{AuthSession, AuthUser};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves `Authorization: Bearer <token>` into an [`AuthUser`] request
/// extension, or rejects the request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let user = state.auth().authorize(header.as_deref()).await?;

    tracing::Span::current().record("user_id", user.username.as_str());
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .auth()
        .register(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let session = state
        .auth()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(session))
}

/// GET /auth/me
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}
