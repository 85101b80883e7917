// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Registration, login and the current trainer.

use crate::error::Result;
use crate::middleware::TrainerScope;
use crate::models::TrainerResponse;
use crate::routes::extract::ValidJson;
use crate::services::auth::{self, AuthResponse, LoginRequest, RegisterRequest};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

/// Public routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Routes behind the auth middleware.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}

async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let resp = auth::register(&state.db, &state.config.jwt_signing_key, req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let resp = auth::login(&state.db, &state.config.jwt_signing_key, req).await?;
    Ok(Json(resp))
}

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
) -> Result<Json<TrainerResponse>> {
    Ok(Json(auth::me(&state.db, &scope).await?))
}
