// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Trainer account model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

use crate::time_utils::rfc3339;

/// Trainer account stored in the `trainers` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    /// Also used as document ID
    pub id: Uuid,
    /// Normalised (trimmed, lowercase) login email
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    pub updated_at: DateTime<Utc>,
}

/// Email reservation in `trainer_emails`, keyed by the normalised email.
///
/// Created with a create-only write so two registrations cannot share an email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerEmail {
    pub trainer_id: Uuid,
}

/// Trainer as returned by the API (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainerResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Trainer> for TrainerResponse {
    fn from(trainer: &Trainer) -> Self {
        Self {
            id: trainer.id,
            email: trainer.email.clone(),
            first_name: trainer.first_name.clone(),
            last_name: trainer.last_name.clone(),
            created_at: trainer.created_at,
            updated_at: trainer.updated_at,
        }
    }
}
