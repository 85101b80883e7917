// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use ptmate_api::config::Config;
use ptmate_api::db::Db;
use ptmate_api::routes::create_router;
use ptmate_api::services::ObjectStore;
use ptmate_api::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Firestore emulator connection.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::firestore("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Test app backed by the in-memory database and object store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db: Db::memory(),
        storage: ObjectStore::memory(),
    });
    (create_router(state.clone()), state)
}

/// Send a request and decode the JSON body (`Value::Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

/// Register a trainer and return the bearer token.
#[allow(dead_code)]
pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "secret123",
            "first_name": "Test",
            "last_name": "Trainer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Create a client with the given package size and return its ID.
#[allow(dead_code)]
pub async fn create_client(app: &Router, token: &str, package: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/clients",
        Some(token),
        Some(json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "phone": "+90 555 000 0000",
            "total_package_size": package,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create client failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Schedule a session and return its ID.
#[allow(dead_code)]
pub async fn create_session(app: &Router, token: &str, client_id: &str, at: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/sessions",
        Some(token),
        Some(json!({ "client_id": client_id, "scheduled_at": at })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create session failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// A complete assessment body with every score set to `score`.
#[allow(dead_code)]
pub fn assessment_body(score: u8) -> Value {
    let mut body = serde_json::Map::new();
    for field in [
        "posture_head_neck",
        "posture_shoulders",
        "posture_lphc",
        "posture_knee",
        "posture_foot",
        "pushup_form",
        "pushup_scapular",
        "pushup_lordosis",
        "pushup_head_pos",
        "squat_feet_out",
        "squat_knees_in",
        "squat_lower_back",
        "squat_arms_forward",
        "squat_lean_forward",
        "balance_correct",
        "balance_knee_in",
        "balance_hip_rise",
        "shoulder_retraction",
        "shoulder_protraction",
        "shoulder_elevation",
        "shoulder_depression",
    ] {
        body.insert(field.to_string(), json!(score));
    }
    Value::Object(body)
}
