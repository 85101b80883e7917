// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Trainer registration, login and password hashing.

use crate::db::{collections, Db};
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, TrainerScope};
use crate::models::{Trainer, TrainerEmail, TrainerResponse};
use anyhow::anyhow;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use once_cell::sync::Lazy;
use password_hash::{PasswordHash, SaltString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub trainer: TrainerResponse,
}

/// Trimmed, lowercased form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Document ID in `trainer_emails`; hashed so any email is a valid key.
fn email_key(normalized: &str) -> String {
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Hash a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verified against when no trainer matches, so unknown emails cost as much
/// as wrong passwords.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("ptmate-dummy-password").ok());

/// Check a password against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Register a trainer and issue a token.
pub async fn register(db: &Db, signing_key: &[u8], mut req: RegisterRequest) -> Result<AuthResponse> {
    req.email = normalize_email(&req.email);
    req.validate()?;

    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation(
            "first_name and last_name are required".to_string(),
        ));
    }

    let now = chrono::Utc::now();
    let trainer = Trainer {
        id: Uuid::new_v4(),
        email: req.email,
        password_hash: hash_password(&req.password)?,
        first_name,
        last_name,
        created_at: now,
        updated_at: now,
    };

    // Trainer before reservation, so a failed write never leaves a
    // reservation pointing at nothing.
    db.put(collections::TRAINERS, &trainer.id.to_string(), &trainer)
        .await?;

    // The reservation is create-only, so two concurrent registrations for
    // one email cannot both succeed.
    let key = email_key(&trainer.email);
    let reservation = TrainerEmail {
        trainer_id: trainer.id,
    };
    match db.insert(collections::TRAINER_EMAILS, &key, &reservation).await {
        Ok(()) => {}
        Err(AppError::Conflict(_)) => claim_stale_reservation(db, &key, &trainer).await?,
        Err(e) => {
            discard_trainer(db, trainer.id).await;
            return Err(e);
        }
    }

    tracing::info!(trainer_id = %trainer.id, "Trainer registered");

    issue(&trainer, signing_key)
}

/// Take over a reservation whose trainer no longer resolves; otherwise the
/// email is genuinely taken and the fresh trainer document is discarded.
async fn claim_stale_reservation(db: &Db, key: &str, trainer: &Trainer) -> Result<()> {
    let existing = db
        .get::<TrainerEmail>(collections::TRAINER_EMAILS, key)
        .await?;
    let owner = match &existing {
        Some(r) => {
            db.get::<Trainer>(collections::TRAINERS, &r.trainer_id.to_string())
                .await?
        }
        None => None,
    };

    if owner.is_some() {
        discard_trainer(db, trainer.id).await;
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    tracing::warn!(
        trainer_id = %trainer.id,
        stale_trainer_id = ?existing.map(|r| r.trainer_id),
        "Reclaiming email reservation with no trainer"
    );
    db.put(
        collections::TRAINER_EMAILS,
        key,
        &TrainerEmail {
            trainer_id: trainer.id,
        },
    )
    .await
}

async fn discard_trainer(db: &Db, trainer_id: Uuid) {
    if let Err(e) = db
        .soft_delete(collections::TRAINERS, &trainer_id.to_string())
        .await
    {
        tracing::warn!(%trainer_id, error = %e, "Failed to discard unregistered trainer");
    }
}

/// Authenticate by email and password.
///
/// Unknown email and wrong password fail identically.
pub async fn login(db: &Db, signing_key: &[u8], req: LoginRequest) -> Result<AuthResponse> {
    let email = normalize_email(&req.email);

    let trainer = match db
        .get::<TrainerEmail>(collections::TRAINER_EMAILS, &email_key(&email))
        .await?
    {
        Some(reservation) => {
            db.get::<Trainer>(collections::TRAINERS, &reservation.trainer_id.to_string())
                .await?
        }
        None => None,
    };

    let Some(trainer) = trainer else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            verify_password(&req.password, dummy);
        }
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&req.password, &trainer.password_hash) {
        tracing::debug!(trainer_id = %trainer.id, "Login rejected");
        return Err(AppError::invalid_credentials());
    }

    tracing::info!(trainer_id = %trainer.id, "Trainer logged in");
    issue(&trainer, signing_key)
}

/// The trainer behind a token.
pub async fn me(db: &Db, scope: &TrainerScope) -> Result<TrainerResponse> {
    db.get::<Trainer>(collections::TRAINERS, &scope.trainer_id().to_string())
        .await?
        .map(|t| TrainerResponse::from(&t))
        .ok_or_else(|| AppError::not_found("Trainer"))
}

fn issue(trainer: &Trainer, signing_key: &[u8]) -> Result<AuthResponse> {
    Ok(AuthResponse {
        token: create_jwt(trainer.id, &trainer.email, signing_key)?,
        trainer: TrainerResponse::from(trainer),
    })
}
