// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Client (trainee) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::package::PackageSummary;
use crate::time_utils::rfc3339;

/// Client record stored in the `clients` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Also used as document ID
    pub id: Uuid,
    /// Owning trainer
    pub trainer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Sessions purchased in the current package
    pub total_package_size: i64,
    #[serde(default, with = "rfc3339::option")]
    pub package_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    pub updated_at: DateTime<Utc>,
}

/// Client together with its derived package counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientView {
    #[serde(flatten)]
    pub client: Client,
    #[serde(flatten)]
    pub package: PackageSummary,
}

/// Short client description embedded in session payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
        }
    }
}
