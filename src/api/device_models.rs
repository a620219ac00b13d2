use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{null_if_empty, parse_id, require_name, require_reference};
use super::{ApiError, ApiJson, AppState, IdResponse, OkResponse};
use crate::models::inventory::DeviceModel;
use crate::services::AuthUser;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceModelRequest {
    pub vendor_id: i32,
    pub name: String,
    pub device_type: Option<String>,
}

impl DeviceModelRequest {
    fn validated(&self) -> Result<(i32, &str), ApiError> {
        let vendor_id = require_reference(self.vendor_id, "vendor_required")?;
        let name = require_name(&self.name)?;
        Ok((vendor_id, name))
    }
}

pub async fn list_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeviceModel>>, ApiError> {
    let models = state.store().list_device_models().await?;
    Ok(Json(models))
}

pub async fn create_model(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<DeviceModelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    let (vendor_id, name) = payload.validated()?;

    let id = state
        .store()
        .create_device_model(vendor_id, name, null_if_empty(payload.device_type.as_deref()))
        .await
        .map_err(|e| ApiError::missing_reference(e, "vendor_not_found"))?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn update_model(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<DeviceModelRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;
    let (vendor_id, name) = payload.validated()?;

    let updated = state
        .store()
        .update_device_model(
            id,
            vendor_id,
            name,
            null_if_empty(payload.device_type.as_deref()),
        )
        .await
        .map_err(|e| ApiError::missing_reference(e, "vendor_not_found"))?;
    if !updated {
        return Err(ApiError::NotFound);
    }

    Ok(Json(IdResponse { id }))
}

pub async fn delete_model(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    if !state.store().delete_device_model(id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(Json(OkResponse::OK))
}
