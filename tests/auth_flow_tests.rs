//! Integration tests for registration, login and the bearer-token gate.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{error_code, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_first_user_becomes_admin() {
    let app = spawn_app().await;

    let (status, body) = app.register("  alice ", "password123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_object().unwrap().len(), 3, "{body}");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "admin");

    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let (status, me) = app.send("GET", "/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
    assert_eq!(me["role"], "admin");
}

#[tokio::test]
async fn test_second_user_waits_for_approval() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app.register("bob", "password123").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "account_pending_approval" }));

    let (status, body) = app.login("bob", "password123").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "account_pending_approval");

    let (_, pending) = app.send("GET", "/users/pending", Some(&admin), None).await;
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["username"], "bob");
    assert_eq!(pending[0]["role"], "user");
    assert_eq!(pending[0]["approved"], false);

    let bob_id = app.user_id(&admin, "bob").await;
    let (status, body) = app
        .send("POST", &format!("/users/{bob_id}/approve"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = app.login("bob", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn test_registration_validation() {
    let app = spawn_app().await;

    let cases = [
        ("   ", "password123", "username_required"),
        ("ab", "password123", "username_length_invalid"),
        ("alice", "short", "password_length_invalid"),
    ];
    for (username, password, code) in cases {
        let (status, body) = app.register(username, password).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{username:?}");
        assert_eq!(error_code(&body), code);
    }

    app.admin_token().await;
    let (status, body) = app.register("alice", "password456").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "username_taken");
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app().await;
    app.admin_token().await;

    let (status, wrong_password) = app.login("alice", "password124").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app.login("mallory", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(error_code(&unknown_user), "invalid_credentials");

    let (status, body) = app.login("", "password123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "username_and_password_required");
}

#[tokio::test]
async fn test_malformed_bodies_are_invalid_json() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_json");

    let (status, body) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "password123", "remember": true })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_json");
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = spawn_app().await;
    app.admin_token().await;

    let (status, body) = app.send("GET", "/vendors", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "missing_authorization");

    let request = Request::builder()
        .uri("/vendors")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6cHc=")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "invalid_authorization");

    let request = Request::builder()
        .uri("/vendors")
        .header(header::AUTHORIZATION, "Bearer   ")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "invalid_authorization");

    let (status, body) = app
        .send("GET", "/vendors", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "invalid_token");
}

#[tokio::test]
async fn test_token_tracks_live_account_state() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let bob = app.approved_user_token(&admin, "bob").await;
    let bob_id = app.user_id(&admin, "bob").await;

    let (status, _) = app.send("GET", "/devices", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            "PUT",
            &format!("/users/{bob_id}/approval"),
            Some(&admin),
            Some(json!({ "approved": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["approved"], false);

    let (status, body) = app.send("GET", "/devices", Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "account_pending_approval");

    let (status, body) = app
        .send("DELETE", &format!("/users/{bob_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");

    let (status, body) = app.send("GET", "/devices", Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "invalid_token");
}

#[tokio::test]
async fn test_user_administration_rules() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let bob = app.approved_user_token(&admin, "bob").await;
    let alice_id = app.user_id(&admin, "alice").await;

    let (status, body) = app.send("GET", "/users", Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "forbidden");

    let (status, body) = app
        .send(
            "PUT",
            &format!("/users/{alice_id}/approval"),
            Some(&admin),
            Some(json!({ "approved": false })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "cannot_disable_admin");

    let (status, body) = app
        .send("DELETE", &format!("/users/{alice_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "cannot_delete_self");

    let (status, body) = app
        .send("POST", "/users/9999/approve", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");

    let (status, body) = app
        .send("POST", "/users/abc/approve", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_id");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let app = spawn_app().await;
    app.state.store().conn.clone().close().await.unwrap();

    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "db_unavailable" }));
}
