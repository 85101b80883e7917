// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! JWT authentication tests.
//!
//! Tokens minted by the login flow must be accepted by the middleware, and
//! anything expired, re-signed or malformed must not be.

use axum::http::{Method, StatusCode};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use ptmate_api::middleware::auth::{create_jwt, verify_jwt, Claims};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

mod common;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn sign(claims: &Claims, key: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(key),
    )
    .expect("Failed to create JWT")
}

#[test]
fn test_jwt_roundtrip() {
    let key = b"test_signing_key_32_bytes_long!!";
    let trainer_id = Uuid::new_v4();

    let token = create_jwt(trainer_id, "coach@example.com", key).unwrap();
    let scope = verify_jwt(&token, key).expect("token should verify");
    assert_eq!(scope.trainer_id(), trainer_id);
}

#[test]
fn test_jwt_rejects_wrong_key() {
    let token = create_jwt(Uuid::new_v4(), "coach@example.com", b"key-one-32-bytes-long-xxxxxxxxxx")
        .unwrap();
    assert!(verify_jwt(&token, b"key-two-32-bytes-long-xxxxxxxxxx").is_err());
}

#[test]
fn test_jwt_rejects_expired_token() {
    let key = b"test_signing_key_32_bytes_long!!";
    let issued = now() - 8 * 24 * 60 * 60;
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "coach@example.com".to_string(),
        iat: issued,
        exp: issued + 60,
    };
    assert!(verify_jwt(&sign(&claims, key), key).is_err());
}

#[test]
fn test_jwt_rejects_non_uuid_subject() {
    let key = b"test_signing_key_32_bytes_long!!";
    let claims = Claims {
        sub: "12345".to_string(),
        email: "coach@example.com".to_string(),
        iat: now(),
        exp: now() + 3600,
    };
    assert!(verify_jwt(&sign(&claims, key), key).is_err());
}

#[tokio::test]
async fn test_token_for_unknown_trainer_sees_nothing() {
    let (app, state) = common::create_test_app();
    let token = create_jwt(
        Uuid::new_v4(),
        "ghost@example.com",
        &state.config.jwt_signing_key,
    )
    .unwrap();

    let (status, body) = common::send(&app, Method::GET, "/api/v1/clients", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, _) = common::send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
