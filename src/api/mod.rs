use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, UserAdminService};
use crate::state::SharedState;

pub mod auth;
mod device_models;
mod devices;
mod error;
mod json;
mod locations;
mod observability;
mod system;
mod types;
mod users;
mod validation;
mod vendors;

pub use error::ApiError;
pub use json::ApiJson;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth(&self) -> &dyn AuthService {
        self.shared.auth.as_ref()
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserAdminService {
        self.shared.users.as_ref()
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected_routes)
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/vendors",
            get(vendors::list_vendors).post(vendors::create_vendor),
        )
        .route(
            "/vendors/{id}",
            put(vendors::update_vendor).delete(vendors::delete_vendor),
        )
        .route(
            "/models",
            get(device_models::list_models).post(device_models::create_model),
        )
        .route(
            "/models/{id}",
            put(device_models::update_model).delete(device_models::delete_model),
        )
        .route(
            "/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/locations/{id}",
            put(locations::update_location).delete(locations::delete_location),
        )
        .route(
            "/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/devices/{id}",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route("/users", get(users::list_users))
        .route("/users/pending", get(users::list_pending))
        .route("/users/{id}/approve", post(users::approve_user))
        .route("/users/{id}/approval", put(users::set_approval))
        .route("/users/{id}", axum::routing::delete(users::delete_user))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
