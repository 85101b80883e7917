// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Progress photo groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time_utils::rfc3339;

/// Most files accepted in one upload.
pub const MAX_PHOTOS_PER_GROUP: usize = 5;

/// Photos uploaded together, stored in `photo_groups`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoGroup {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "rfc3339")]
    pub updated_at: DateTime<Utc>,
}

/// One stored image, stored in `photos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    pub id: Uuid,
    pub photo_group_id: Uuid,
    /// Object storage URL, or a `/uploads/...` placeholder when storage is unconfigured
    pub url: String,
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    #[serde(with = "rfc3339")]
    pub created_at: DateTime<Utc>,
}

/// Group with its photos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoGroupView {
    #[serde(flatten)]
    pub group: PhotoGroup,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Stored,
    Failed,
}

/// Per-file outcome of an upload batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadOutcome {
    pub file: String,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Upload response: the created group plus what happened to each file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoUploadResponse {
    #[serde(flatten)]
    pub group: PhotoGroupView,
    pub results: Vec<UploadOutcome>,
}
