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
use crate::models::inventory::Vendor;
use crate::services::AuthUser;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VendorRequest {
    pub name: String,
    pub country: Option<String>,
}

pub async fn list_vendors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Vendor>>, ApiError> {
    let vendors = state.store().list_vendors().await?;
    Ok(Json(vendors))
}

pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<VendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let name = require_name(&payload.name)?;

    let id = state
        .store()
        .create_vendor(name, null_if_empty(payload.country.as_deref()))
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn update_vendor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<VendorRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;
    let name = require_name(&payload.name)?;

    let updated = state
        .store()
        .update_vendor(id, name, null_if_empty(payload.country.as_deref()))
        .await?;
    if !updated {
        return Err(ApiError::NotFound);
    }

    Ok(Json(IdResponse { id }))
}

pub async fn delete_vendor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    if !state.store().delete_vendor(id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(Json(OkResponse::OK))
}
