// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

use crate::error::Result;
use crate::middleware::TrainerScope;
use crate::models::{AssessmentAnswers, AssessmentView};
use crate::routes::extract::{parse_id, ValidJson};
use crate::routes::MessageResponse;
use crate::services::assessments::{self, UpdateAssessmentRequest};
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
            "/clients/{id}/assessments",
            get(list_assessments).post(create_assessment),
        )
        .route(
            "/assessments/{id}",
            get(get_assessment)
                .put(update_assessment)
                .delete(delete_assessment),
        )
}

async fn list_assessments(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<AssessmentView>>> {
    let client_id = parse_id(&client_id, "client")?;
    Ok(Json(assessments::list(&state.db, &scope, client_id).await?))
}

async fn create_assessment(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(client_id): Path<String>,
    ValidJson(answers): ValidJson<AssessmentAnswers>,
) -> Result<(StatusCode, Json<AssessmentView>)> {
    let client_id = parse_id(&client_id, "client")?;
    let view = assessments::create(&state.db, &scope, client_id, answers).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_assessment(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<AssessmentView>> {
    let id = parse_id(&id, "assessment")?;
    Ok(Json(assessments::get(&state.db, &scope, id).await?))
}

async fn update_assessment(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
    ValidJson(changes): ValidJson<UpdateAssessmentRequest>,
) -> Result<Json<AssessmentView>> {
    let id = parse_id(&id, "assessment")?;
    Ok(Json(
        assessments::update(&state.db, &scope, id, changes).await?,
    ))
}

async fn delete_assessment(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<TrainerScope>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "assessment")?;
    assessments::delete(&state.db, &scope, id).await?;
    Ok(Json(MessageResponse::new("Assessment deleted successfully")))
}
