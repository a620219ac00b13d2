use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{null_if_empty, parse_id, require_name};
use super::{ApiError, ApiJson, AppState, IdResponse, OkResponse};
use crate::models::inventory::Location;
use crate::services::AuthUser;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationRequest {
    pub name: String,
    pub note: Option<String>,
}

pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let locations = state.store().list_locations().await?;
    Ok(Json(locations))
}

pub async fn create_location(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<LocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let name = require_name(&payload.name)?;

    let id = state
        .store()
        .create_location(name, null_if_empty(payload.note.as_deref()))
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<LocationRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;
    let name = require_name(&payload.name)?;

    let updated = state
        .store()
        .update_location(id, name, null_if_empty(payload.note.as_deref()))
        .await?;
    if !updated {
        return Err(ApiError::NotFound);
    }

    Ok(Json(IdResponse { id }))
}

pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    if !state.store().delete_location(id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(Json(OkResponse::OK))
}
