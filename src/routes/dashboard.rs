// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

use crate::error::Result;
use crate::middleware::TrainerScope;
use crate::routes::sessions::parse_bound;
use crate::services::dashboard::{self, CalendarResponse, DashboardResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/calendar", get(get_calendar))
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
) -> Result<Json<DashboardResponse>> {
    let view = dashboard::dashboard(&state.db, &scope, state.config.timezone, Utc::now()).await?;
    Ok(Json(view))
}

#[derive(Deserialize)]
struct CalendarQuery {
    from: Option<String>,
    to: Option<String>,
}

async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Query(params): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>> {
    let tz = state.config.timezone;
    let from = parse_bound(params.from.as_deref(), "from", tz)?;
    let to = parse_bound(params.to.as_deref(), "to", tz)?;
    Ok(Json(dashboard::calendar(&state.db, &scope, from, to).await?))
}
