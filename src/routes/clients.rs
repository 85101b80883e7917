// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Client registry routes.

use crate::error::Result;
use crate::middleware::TrainerScope;
use crate::models::{Client, ClientView};
use crate::routes::extract::{parse_id, ValidJson};
use crate::routes::MessageResponse;
use crate::services::clients::{self, CreateClientRequest, UpdateClientRequest};
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
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
) -> Result<Json<Vec<ClientView>>> {
    Ok(Json(clients::list(&state.db, &scope).await?))
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    ValidJson(req): ValidJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>)> {
    let client = clients::create(&state.db, &scope, req).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<ClientView>> {
    let id = parse_id(&id, "client")?;
    Ok(Json(clients::get(&state.db, &scope, id).await?))
}

async fn update_client(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateClientRequest>,
) -> Result<Json<Client>> {
    let id = parse_id(&id, "client")?;
    Ok(Json(clients::update(&state.db, &scope, id, req).await?))
}

async fn delete_client(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "client")?;
    clients::delete(&state.db, &scope, id).await?;
    Ok(Json(MessageResponse::new("Client deleted successfully")))
}
