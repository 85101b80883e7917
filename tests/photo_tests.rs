// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Multipart photo uploads against the in-memory object store.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use ptmate_api::services::ObjectStore;
use serde_json::Value;
use tower::ServiceExt;

mod common;

const BOUNDARY: &str = "ptmate-test-boundary";

/// Build a multipart body with `count` small JPEG parts and optional notes.
fn multipart_body(count: usize, notes: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    for i in 0..count {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photos\"; filename=\"front-{i}.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0xFF, 0xD8, 0xFF, i as u8]);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(notes) = notes {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"notes\"\r\n\r\n{notes}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &Router, token: &str, client_id: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/clients/{client_id}/photos"))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    common::read_json(response).await
}

#[tokio::test]
async fn test_upload_list_and_delete_group() {
    let (app, state) = common::create_test_app();
    let token = common::register(&app, "photos@example.com").await;
    let client_id = common::create_client(&app, &token, 10).await;

    let (status, body) = upload(&app, &token, &client_id, multipart_body(3, Some("Week 1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notes"], "Week 1");
    assert_eq!(body["photos"].as_array().unwrap().len(), 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
    assert!(body["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["status"] == "stored"));
    assert_eq!(body["photos"][0]["file_name"], "front-0.jpg");
    assert_eq!(body["photos"][0]["content_type"], "image/jpeg");
    assert_eq!(body["photos"][0]["file_size"], 4);
    let group_id = body["id"].as_str().unwrap().to_string();

    let ObjectStore::Memory(store) = &state.storage else {
        panic!("test app uses the memory store");
    };
    assert_eq!(store.len(), 3);

    let (status, groups) = common::send(
        &app,
        Method::GET,
        &format!("/api/v1/clients/{client_id}/photos"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(groups.as_array().unwrap().len(), 1);
    assert_eq!(groups[0]["photos"].as_array().unwrap().len(), 3);

    let other = common::register(&app, "photos-other@example.com").await;
    let (status, _) = common::send(
        &app,
        Method::DELETE,
        &format!("/api/v1/photo-groups/{group_id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::send(
        &app,
        Method::DELETE,
        &format!("/api/v1/photo-groups/{group_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Photo group deleted successfully");
    assert!(store.is_empty());

    let (_, groups) = common::send(
        &app,
        Method::GET,
        &format!("/api/v1/clients/{client_id}/photos"),
        Some(&token),
        None,
    )
    .await;
    assert!(groups.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_count_limits() {
    let (app, _state) = common::create_test_app();
    let token = common::register(&app, "limits@example.com").await;
    let client_id = common::create_client(&app, &token, 10).await;

    let (status, body) = upload(&app, &token, &client_id, multipart_body(6, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Maximum 5 photos allowed per upload");

    let (status, body) = upload(&app, &token, &client_id, multipart_body(0, Some("empty"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No photos provided");

    // Rejected uploads leave nothing behind
    let (_, groups) = common::send(
        &app,
        Method::GET,
        &format!("/api/v1/clients/{client_id}/photos"),
        Some(&token),
        None,
    )
    .await;
    assert!(groups.as_array().unwrap().is_empty());

    let (status, body) = upload(&app, &token, &client_id, multipart_body(5, None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["photos"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_upload_to_foreign_client_is_not_found() {
    let (app, _state) = common::create_test_app();
    let owner = common::register(&app, "p-owner@example.com").await;
    let other = common::register(&app, "p-other@example.com").await;
    let client_id = common::create_client(&app, &owner, 10).await;

    let (status, body) = upload(&app, &other, &client_id, multipart_body(1, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Client not found");
}
