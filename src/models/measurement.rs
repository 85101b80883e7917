// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Body measurement snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time_utils::rfc3339;

/// Measurement stored in the `measurements` collection. Never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub id: Uuid,
    pub client_id: Uuid,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub flexibility_cm: Option<f64>,
    #[serde(default)]
    pub notes: String,
    /// When the metrics were taken (defaults to creation time)
    #[serde(with = "rfc3339")]
    pub measured_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
}
