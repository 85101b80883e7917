// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Progress photo groups.
//!
//! Files in one upload are stored one after another. A file that fails to
//! store does not stop the rest; its failure is reported in the per-file
//! results instead.

use crate::db::{collections, Db, Filter};
use crate::error::{AppError, Result};
use crate::middleware::TrainerScope;
use crate::models::photo::{UploadStatus, MAX_PHOTOS_PER_GROUP};
use crate::models::{Photo, PhotoGroup, PhotoGroupView, PhotoUploadResponse, UploadOutcome};
use crate::services::clients;
use crate::services::storage::ObjectStore;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

/// One file taken from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Message reported for a file the object store would not take.
const STORE_FAILED: &str = "Upload to object storage failed";

pub async fn upload(
    db: &Db,
    store: &ObjectStore,
    scope: &TrainerScope,
    client_id: Uuid,
    notes: String,
    files: Vec<UploadFile>,
) -> Result<PhotoUploadResponse> {
    let client = clients::owned_client(db, scope, client_id).await?;

    if files.is_empty() {
        return Err(AppError::Validation("No photos provided".to_string()));
    }
    if files.len() > MAX_PHOTOS_PER_GROUP {
        return Err(AppError::Validation(format!(
            "Maximum {} photos allowed per upload",
            MAX_PHOTOS_PER_GROUP
        )));
    }

    let now = Utc::now();
    let group = PhotoGroup {
        id: Uuid::new_v4(),
        client_id: client.id,
        notes,
        created_at: now,
        updated_at: now,
    };
    db.put(collections::PHOTO_GROUPS, &group.id.to_string(), &group)
        .await?;

    let mut photos = Vec::with_capacity(files.len());
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let file_size = file.bytes.len() as i64;
        match store
            .put(file.bytes, &file.file_name, &file.content_type)
            .await
        {
            Ok(stored) => {
                let photo = Photo {
                    id: Uuid::new_v4(),
                    photo_group_id: group.id,
                    url: stored.url,
                    file_name: file.file_name.clone(),
                    file_size,
                    content_type: file.content_type,
                    created_at: Utc::now(),
                };
                db.put(collections::PHOTOS, &photo.id.to_string(), &photo)
                    .await?;
                photos.push(photo);
                results.push(UploadOutcome {
                    file: file.file_name,
                    status: UploadStatus::Stored,
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!(
                    group_id = %group.id,
                    file = %file.file_name,
                    error = %e,
                    "Photo upload failed"
                );
                results.push(UploadOutcome {
                    file: file.file_name,
                    status: UploadStatus::Failed,
                    error: Some(STORE_FAILED.to_string()),
                });
            }
        }
    }

    tracing::info!(
        group_id = %group.id,
        client_id = %client.id,
        stored = photos.len(),
        failed = results.len() - photos.len(),
        "Photo group uploaded"
    );

    Ok(PhotoUploadResponse {
        group: PhotoGroupView { group, photos },
        results,
    })
}

/// The client's photo groups, newest first, each with its photos in upload order.
pub async fn list(db: &Db, scope: &TrainerScope, client_id: Uuid) -> Result<Vec<PhotoGroupView>> {
    let client = clients::owned_client(db, scope, client_id).await?;

    let mut groups: Vec<PhotoGroup> = db
        .query(
            collections::PHOTO_GROUPS,
            vec![Filter::eq("client_id", client.id)],
        )
        .await?;
    groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
    let mut by_group: HashMap<Uuid, Vec<Photo>> = HashMap::new();
    let photos: Vec<Photo> = db
        .query(
            collections::PHOTOS,
            vec![Filter::is_in("photo_group_id", &group_ids)],
        )
        .await?;
    for photo in photos {
        by_group.entry(photo.photo_group_id).or_default().push(photo);
    }

    Ok(groups
        .into_iter()
        .map(|group| {
            let mut photos = by_group.remove(&group.id).unwrap_or_default();
            photos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            PhotoGroupView { group, photos }
        })
        .collect())
}

/// Remove stored objects (best effort), then soft-delete photos and the group.
pub async fn delete_group(
    db: &Db,
    store: &ObjectStore,
    scope: &TrainerScope,
    group_id: Uuid,
) -> Result<()> {
    let not_found = || AppError::not_found("Photo group");

    let group = db
        .get::<PhotoGroup>(collections::PHOTO_GROUPS, &group_id.to_string())
        .await?
        .ok_or_else(not_found)?;
    clients::owned_client(db, scope, group.client_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => not_found(),
            other => other,
        })?;

    let photos: Vec<Photo> = db
        .query(
            collections::PHOTOS,
            vec![Filter::eq("photo_group_id", group.id)],
        )
        .await?;

    for photo in &photos {
        if let Err(e) = store.delete(&photo.url).await {
            tracing::warn!(photo_id = %photo.id, error = %e, "Failed to delete stored photo");
        }
        db.soft_delete(collections::PHOTOS, &photo.id.to_string())
            .await?;
    }

    if !db
        .soft_delete(collections::PHOTO_GROUPS, &group.id.to_string())
        .await?
    {
        return Err(not_found());
    }

    tracing::info!(group_id = %group.id, photos = photos.len(), "Photo group deleted");
    Ok(())
}
