use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::parse_id;
use super::{ApiError, ApiJson, AppState, ApprovalResponse, StatusResponse, UserDto};
use crate::services::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApprovalRequest {
    pub approved: bool,
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    user.require_admin()?;
    let users = state.users().list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// GET /users/pending
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    user.require_admin()?;
    let users = state.users().list_pending().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// POST /users/{id}/approve
pub async fn approve_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    state.users().approve(id).await?;
    Ok(Json(StatusResponse { status: "approved" }))
}

/// PUT /users/{id}/approval
pub async fn set_approval(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ApprovalRequest>,
) -> Result<Json<ApprovalResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    state.users().set_approval(id, payload.approved).await?;
    Ok(Json(ApprovalResponse {
        status: "ok",
        approved: payload.approved,
    }))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    state.users().delete(&user.username, id).await?;
    Ok(Json(StatusResponse { status: "deleted" }))
}
