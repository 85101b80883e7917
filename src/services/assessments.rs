// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Fitness assessments. A client may have any number of them; history is kept.

use crate::db::{collections, Db, Filter};
use crate::error::{AppError, Result};
use crate::middleware::TrainerScope;
use crate::models::{Assessment, AssessmentAnswers, AssessmentView};
use crate::services::clients;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

/// Sparse update body: any subset of the answer fields.
pub type UpdateAssessmentRequest = Map<String, Value>;

pub async fn create(
    db: &Db,
    scope: &TrainerScope,
    client_id: Uuid,
    answers: AssessmentAnswers,
) -> Result<AssessmentView> {
    answers.validate()?;
    let client = clients::owned_client(db, scope, client_id).await?;

    let now = Utc::now();
    let assessment = Assessment {
        id: Uuid::new_v4(),
        client_id: client.id,
        answers,
        created_at: now,
        updated_at: now,
    };

    db.put(
        collections::ASSESSMENTS,
        &assessment.id.to_string(),
        &assessment,
    )
    .await?;

    tracing::info!(
        assessment_id = %assessment.id,
        client_id = %client.id,
        total_score = assessment.answers.total_score(),
        "Assessment recorded"
    );
    Ok(AssessmentView::from(assessment))
}

/// Newest first.
pub async fn list(db: &Db, scope: &TrainerScope, client_id: Uuid) -> Result<Vec<AssessmentView>> {
    let client = clients::owned_client(db, scope, client_id).await?;

    let mut assessments: Vec<Assessment> = db
        .query(
            collections::ASSESSMENTS,
            vec![Filter::eq("client_id", client.id)],
        )
        .await?;
    assessments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(assessments.into_iter().map(AssessmentView::from).collect())
}

async fn owned_assessment(db: &Db, scope: &TrainerScope, id: Uuid) -> Result<Assessment> {
    let assessment = db
        .get::<Assessment>(collections::ASSESSMENTS, &id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Assessment"))?;

    clients::owned_client(db, scope, assessment.client_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::not_found("Assessment"),
            other => other,
        })?;

    Ok(assessment)
}

pub async fn get(db: &Db, scope: &TrainerScope, id: Uuid) -> Result<AssessmentView> {
    owned_assessment(db, scope, id).await.map(AssessmentView::from)
}

/// Overlay the supplied answer fields onto the stored ones. Keys that are
/// not answer fields are ignored; a `null` note clears it.
pub async fn update(
    db: &Db,
    scope: &TrainerScope,
    id: Uuid,
    changes: UpdateAssessmentRequest,
) -> Result<AssessmentView> {
    let mut assessment = owned_assessment(db, scope, id).await?;
    assessment.answers = merge_answers(&assessment.answers, changes)?;
    assessment.updated_at = Utc::now();

    db.put(
        collections::ASSESSMENTS,
        &assessment.id.to_string(),
        &assessment,
    )
    .await?;

    tracing::info!(assessment_id = %assessment.id, "Assessment updated");
    Ok(AssessmentView::from(assessment))
}

fn merge_answers(current: &AssessmentAnswers, changes: UpdateAssessmentRequest) -> Result<AssessmentAnswers> {
    let mut merged = match serde_json::to_value(current) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => return Err(anyhow::anyhow!("answers did not encode as an object").into()),
        Err(e) => return Err(anyhow::Error::from(e).into()),
    };

    for (key, value) in changes {
        if !merged.contains_key(&key) {
            continue;
        }
        let value = match value {
            Value::Null if key == "notes" => Value::String(String::new()),
            other => other,
        };
        merged.insert(key, value);
    }

    let answers: AssessmentAnswers = serde_json::from_value(Value::Object(merged))
        .map_err(|e| AppError::Validation(e.to_string()))?;
    answers.validate()?;
    Ok(answers)
}

pub async fn delete(db: &Db, scope: &TrainerScope, id: Uuid) -> Result<()> {
    let assessment = owned_assessment(db, scope, id).await?;
    if !db
        .soft_delete(collections::ASSESSMENTS, &assessment.id.to_string())
        .await?
    {
        return Err(AppError::not_found("Assessment"));
    }

    tracing::info!(assessment_id = %assessment.id, "Assessment deleted");
    Ok(())
}
