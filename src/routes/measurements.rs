// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

use crate::error::Result;
use crate::middleware::TrainerScope;
use crate::models::Measurement;
use crate::routes::extract::{parse_id, ValidJson};
use crate::routes::MessageResponse;
use crate::services::measurements::{self, CreateMeasurementRequest};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/clients/{id}/measurements",
            get(list_measurements).post(create_measurement),
        )
        .route(
            "/measurements/{id}",
            get(get_measurement).delete(delete_measurement),
        )
}

async fn list_measurements(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<Measurement>>> {
    let client_id = parse_id(&client_id, "client")?;
    Ok(Json(measurements::list(&state.db, &scope, client_id).await?))
}

async fn create_measurement(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(client_id): Path<String>,
    ValidJson(req): ValidJson<CreateMeasurementRequest>,
) -> Result<(StatusCode, Json<Measurement>)> {
    let client_id = parse_id(&client_id, "client")?;
    let measurement = measurements::create(&state.db, &scope, client_id, req).await?;
    Ok((StatusCode::CREATED, Json(measurement)))
}

async fn get_measurement(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<Measurement>> {
    let id = parse_id(&id, "measurement")?;
    Ok(Json(measurements::get(&state.db, &scope, id).await?))
}

async fn delete_measurement(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "measurement")?;
    measurements::delete(&state.db, &scope, id).await?;
    Ok(Json(MessageResponse::new("Measurement deleted successfully")))
}
