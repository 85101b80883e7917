// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and skip
//! otherwise. Set FIRESTORE_EMULATOR_HOST before `cargo test`.

use axum::http::{Method, StatusCode};
use ptmate_api::config::Config;
use ptmate_api::db::{collections, Filter};
use ptmate_api::models::{Client, Session, SessionStatus};
use ptmate_api::routes::create_router;
use ptmate_api::services::ObjectStore;
use ptmate_api::AppState;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

mod common;
use common::test_db;

fn unique_email(tag: &str) -> String {
    format!("{}-{}@example.com", tag, Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_soft_delete_hides_documents() {
    require_emulator!();

    let db = test_db().await;
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();
    let client = Client {
        id,
        trainer_id: Uuid::new_v4(),
        first_name: "Emu".to_string(),
        last_name: "Lator".to_string(),
        phone: String::new(),
        email: String::new(),
        total_package_size: 8,
        package_start_date: None,
        notes: String::new(),
        created_at: now,
        updated_at: now,
    };

    db.put(collections::CLIENTS, &id.to_string(), &client)
        .await
        .unwrap();
    let fetched: Option<Client> = db.get(collections::CLIENTS, &id.to_string()).await.unwrap();
    assert_eq!(fetched, Some(client.clone()));

    let by_trainer: Vec<Client> = db
        .query(
            collections::CLIENTS,
            vec![Filter::eq("trainer_id", client.trainer_id)],
        )
        .await
        .unwrap();
    assert_eq!(by_trainer.len(), 1);

    assert!(db.soft_delete(collections::CLIENTS, &id.to_string()).await.unwrap());
    let gone: Option<Client> = db.get(collections::CLIENTS, &id.to_string()).await.unwrap();
    assert!(gone.is_none());

    // Still stored, just marked
    let raw = db.get_raw(collections::CLIENTS, &id.to_string()).await.unwrap();
    assert!(raw.unwrap()["deleted_at"].is_string());
}

#[tokio::test]
async fn test_insert_is_create_only() {
    require_emulator!();

    let db = test_db().await;
    let key = Uuid::new_v4().to_string();
    let doc = json!({"trainer_id": Uuid::new_v4()});

    db.insert(collections::TRAINER_EMAILS, &key, &doc).await.unwrap();
    let second = db.insert(collections::TRAINER_EMAILS, &key, &doc).await;
    assert!(matches!(second, Err(ptmate_api::error::AppError::Conflict(_))));
}

#[tokio::test]
async fn test_in_filter_over_many_values() {
    require_emulator!();

    let db = test_db().await;
    let client_ids: Vec<Uuid> = (0..45).map(|_| Uuid::new_v4()).collect();
    let now = chrono::Utc::now();

    for (i, client_id) in client_ids.iter().enumerate() {
        let session = Session {
            id: Uuid::new_v4(),
            client_id: *client_id,
            scheduled_at: now + chrono::Duration::minutes(i as i64),
            duration_minutes: 60,
            status: SessionStatus::Scheduled,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        db.put(collections::SESSIONS, &session.id.to_string(), &session)
            .await
            .unwrap();
    }

    // More values than one Firestore IN clause allows
    let found: Vec<Session> = db
        .query(
            collections::SESSIONS,
            vec![Filter::is_in("client_id", &client_ids)],
        )
        .await
        .unwrap();
    assert_eq!(found.len(), client_ids.len());
}

#[tokio::test]
async fn test_end_to_end_against_emulator() {
    require_emulator!();

    let state = Arc::new(AppState {
        config: Config::test_default(),
        db: test_db().await,
        storage: ObjectStore::memory(),
    });
    let app = create_router(state);

    let token = common::register(&app, &unique_email("e2e")).await;
    let client_id = common::create_client(&app, &token, 4).await;
    let session_id = common::create_session(&app, &token, &client_id, "2026-02-02T09:00:00Z").await;

    let (status, _) = common::send(
        &app,
        Method::PATCH,
        &format!("/api/v1/sessions/{session_id}/status"),
        Some(&token),
        Some(json!({"status": "no_show"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, client) = common::send(
        &app,
        Method::GET,
        &format!("/api/v1/clients/{client_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(client["no_show_sessions"], 1);
    assert_eq!(client["remaining_sessions"], 3);
}
