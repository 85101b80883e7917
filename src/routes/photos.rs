// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Progress photo routes. Uploads are `multipart/form-data` with one or more
//! `photos` file parts and an optional `notes` text part.

use crate::error::{AppError, Result};
use crate::middleware::TrainerScope;
use crate::models::{PhotoGroupView, PhotoUploadResponse};
use crate::routes::extract::parse_id;
use crate::routes::MessageResponse;
use crate::services::photos::{self, UploadFile};
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use std::sync::Arc;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/clients/{id}/photos",
            get(list_photos)
                .post(upload_photos)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/photo-groups/{id}", delete(delete_photo_group))
}

async fn list_photos(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<PhotoGroupView>>> {
    let client_id = parse_id(&client_id, "client")?;
    Ok(Json(photos::list(&state.db, &scope, client_id).await?))
}

async fn upload_photos(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(client_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoUploadResponse>)> {
    let client_id = parse_id(&client_id, "client")?;

    let mut notes = String::new();
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("photos") => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                files.push(UploadFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("notes") => notes = field.text().await.map_err(bad_form)?,
            _ => {}
        }
    }

    let response = photos::upload(&state.db, &state.storage, &scope, client_id, notes, files)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

fn bad_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart form: {}", e.body_text()))
}

async fn delete_photo_group(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "photo group")?;
    photos::delete_group(&state.db, &state.storage, &scope, id).await?;
    Ok(Json(MessageResponse::new("Photo group deleted successfully")))
}
