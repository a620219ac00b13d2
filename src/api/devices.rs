use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{null_if_empty, parse_id, parse_installed_at, require_reference};
use super::{ApiError, ApiJson, AppState, IdResponse, OkResponse};
use crate::db::{Constraint, Store, violated_constraint};
use crate::models::inventory::{Device, DeviceInput, DeviceListItem};
use crate::services::AuthUser;

const DEFAULT_STATUS: &str = "active";

#[derive(Debug, Default, Deserialize)]
pub struct DeviceListQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceRequest {
    pub model_id: i32,
    pub location_id: Option<i32>,
    pub serial_number: Option<String>,
    pub inventory_number: Option<String>,
    pub status: Option<String>,
    pub installed_at: Option<String>,
    pub description: Option<String>,
}

impl DeviceRequest {
    fn into_input(self) -> Result<DeviceInput, ApiError> {
        let model_id = require_reference(self.model_id, "model_required")?;
        let installed_at = parse_installed_at(self.installed_at.as_deref())?;

        let owned = |v: Option<String>| null_if_empty(v.as_deref()).map(str::to_string);

        Ok(DeviceInput {
            model_id,
            location_id: self.location_id,
            status: owned(self.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            serial_number: owned(self.serial_number),
            inventory_number: owned(self.inventory_number),
            installed_at,
            description: owned(self.description),
        })
    }
}

/// Names the reference a failed device write pointed at.
async fn reference_error(store: &Store, err: anyhow::Error, input: &DeviceInput) -> ApiError {
    if violated_constraint(&err) != Some(Constraint::ForeignKey) {
        return err.into();
    }

    let model_exists = match store.device_model_exists(input.model_id).await {
        Ok(exists) => exists,
        Err(e) => return e.into(),
    };
    if !model_exists {
        return ApiError::validation("model_not_found");
    }

    let Some(location_id) = input.location_id else {
        return err.into();
    };
    match store.location_exists(location_id).await {
        Ok(false) => ApiError::validation("location_not_found"),
        Ok(true) => err.into(),
        Err(e) => e.into(),
    }
}

pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeviceListQuery>,
) -> Result<Json<Vec<DeviceListItem>>, ApiError> {
    let devices = state.store().list_devices(query.q.trim()).await?;
    Ok(Json(devices))
}

pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Device>, ApiError> {
    let id = parse_id(&id)?;

    let device = state
        .store()
        .get_device(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(device))
}

pub async fn create_device(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<DeviceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input()?;

    let id = match state.store().create_device(&input).await {
        Ok(id) => id,
        Err(e) => return Err(reference_error(state.store(), e, &input).await),
    };

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn update_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<DeviceRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = parse_id(&id)?;
    let input = payload.into_input()?;

    let updated = match state.store().update_device(id, &input).await {
        Ok(updated) => updated,
        Err(e) => return Err(reference_error(state.store(), e, &input).await),
    };
    if !updated {
        return Err(ApiError::NotFound);
    }

    Ok(Json(IdResponse { id }))
}

pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;

    if !state.store().delete_device(id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(Json(OkResponse::OK))
}
