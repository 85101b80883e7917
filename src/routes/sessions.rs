// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Session ledger routes.

use crate::error::{AppError, Result};
use crate::middleware::TrainerScope;
use crate::models::SessionView;
use crate::routes::extract::{parse_id, ValidJson};
use crate::routes::MessageResponse;
use crate::services::sessions::{
    self, CreateSessionRequest, SessionFilter, UpdateSessionRequest, UpdateStatusRequest,
};
use crate::time_utils::parse_time_bound;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/{id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/sessions/{id}/status", patch(update_status))
}

/// Raw list query; each value is checked before any lookup happens.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SessionsQuery {
    client_id: Option<String>,
    status: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

pub(crate) fn parse_bound(
    raw: Option<&str>,
    name: &str,
    tz: FixedOffset,
) -> Result<Option<DateTime<Utc>>> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_time_bound(s, tz)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid {} date", name))),
    }
}

impl SessionsQuery {
    fn into_filter(self, tz: FixedOffset) -> Result<SessionFilter> {
        let client_id = match self.client_id.as_deref().filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => Some(parse_id(raw, "client")?),
        };
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => Some(sessions::parse_status(raw)?),
        };

        Ok(SessionFilter {
            client_id,
            status,
            from: parse_bound(self.from.as_deref(), "from", tz)?,
            to: parse_bound(self.to.as_deref(), "to", tz)?,
        })
    }
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Query(params): Query<SessionsQuery>,
) -> Result<Json<Vec<SessionView>>> {
    let filter = params.into_filter(state.config.timezone)?;
    Ok(Json(sessions::list(&state.db, &scope, filter).await?))
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    ValidJson(req): ValidJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let view = sessions::create(&state.db, &scope, req).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>> {
    let id = parse_id(&id, "session")?;
    Ok(Json(sessions::get(&state.db, &scope, id).await?))
}

async fn update_session(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateSessionRequest>,
) -> Result<Json<SessionView>> {
    let id = parse_id(&id, "session")?;
    Ok(Json(sessions::update(&state.db, &scope, id, req).await?))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateStatusRequest>,
) -> Result<Json<SessionView>> {
    let id = parse_id(&id, "session")?;
    Ok(Json(
        sessions::update_status(&state.db, &scope, id, &req.status).await?,
    ))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "session")?;
    sessions::delete(&state.db, &scope, id).await?;
    Ok(Json(MessageResponse::new("Session deleted successfully")))
}
