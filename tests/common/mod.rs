#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use telecombase::api::AppState;
use telecombase::config::Config;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

pub async fn spawn_app() -> TestApp {
    let db_path =
        std::env::temp_dir().join(format!("telecombase-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;

    let state = telecombase::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: telecombase::api::router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers `username` and returns the response body.
    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/auth/register",
            None,
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    /// First registration on a fresh database: an approved admin.
    pub async fn admin_token(&self) -> String {
        let (status, body) = self.register("alice", "password123").await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Registers `username`, approves it as the admin and logs it in.
    pub async fn approved_user_token(&self, admin_token: &str, username: &str) -> String {
        let (status, _) = self.register(username, "password123").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let id = self.user_id(admin_token, username).await;
        let (status, _) = self
            .send("POST", &format!("/users/{id}/approve"), Some(admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self.login(username, "password123").await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn user_id(&self, admin_token: &str, username: &str) -> i64 {
        let (_, body) = self.send("GET", "/users", Some(admin_token), None).await;
        body
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["username"] == username)
            .and_then(|u| u["id"].as_i64())
            .unwrap()
    }
}

pub fn error_code(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}
