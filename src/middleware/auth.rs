// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Bearer tokens stay valid for a week.
const TOKEN_LIFETIME_SECS: usize = 7 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (trainer ID)
    pub sub: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// The authenticated trainer a request acts for.
///
/// Only the auth middleware mints one; every service call that touches
/// trainer-owned data takes it by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerScope {
    trainer_id: Uuid,
}

impl TrainerScope {
    pub(crate) fn new(trainer_id: Uuid) -> Self {
        Self { trainer_id }
    }

    pub fn trainer_id(&self) -> Uuid {
        self.trainer_id
    }
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Authorization header required".to_string()))?;

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty() && !t.contains(' '))
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

    let scope = verify_jwt(token, &state.config.jwt_signing_key)?;
    request.extensions_mut().insert(scope);

    Ok(next.run(request).await)
}

/// Verify signature and expiry, returning the caller's scope.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Result<TrainerScope, AppError> {
    let invalid = || AppError::Unauthorized("Invalid or expired token".to_string());

    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|_| invalid())?;
    let trainer_id = Uuid::parse_str(&token_data.claims.sub).map_err(|_| invalid())?;

    Ok(TrainerScope::new(trainer_id))
}

/// Create a JWT for a trainer.
pub fn create_jwt(trainer_id: Uuid, email: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: trainer_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
