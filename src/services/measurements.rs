// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Body measurement log. Records are immutable once written.

use crate::db::{collections, Db, Filter};
use crate::error::{AppError, Result};
use crate::middleware::TrainerScope;
use crate::models::Measurement;
use crate::services::clients;
use crate::time_utils::rfc3339;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct CreateMeasurementRequest {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub flexibility_cm: Option<f64>,
    #[serde(default)]
    pub notes: String,
    /// Defaults to now.
    #[serde(default, with = "rfc3339::option")]
    pub measured_at: Option<DateTime<Utc>>,
}

pub async fn create(
    db: &Db,
    scope: &TrainerScope,
    client_id: Uuid,
    req: CreateMeasurementRequest,
) -> Result<Measurement> {
    let client = clients::owned_client(db, scope, client_id).await?;

    let now = Utc::now();
    let measurement = Measurement {
        id: Uuid::new_v4(),
        client_id: client.id,
        weight_kg: req.weight_kg,
        height_cm: req.height_cm,
        body_fat_percent: req.body_fat_percent,
        waist_cm: req.waist_cm,
        hip_cm: req.hip_cm,
        flexibility_cm: req.flexibility_cm,
        notes: req.notes,
        measured_at: req.measured_at.unwrap_or(now),
        created_at: now,
    };

    db.put(
        collections::MEASUREMENTS,
        &measurement.id.to_string(),
        &measurement,
    )
    .await?;

    tracing::info!(measurement_id = %measurement.id, client_id = %client.id, "Measurement recorded");
    Ok(measurement)
}

/// Most recent first.
pub async fn list(db: &Db, scope: &TrainerScope, client_id: Uuid) -> Result<Vec<Measurement>> {
    let client = clients::owned_client(db, scope, client_id).await?;

    let mut measurements: Vec<Measurement> = db
        .query(
            collections::MEASUREMENTS,
            vec![Filter::eq("client_id", client.id)],
        )
        .await?;
    measurements.sort_by(|a, b| b.measured_at.cmp(&a.measured_at));
    Ok(measurements)
}

async fn owned_measurement(db: &Db, scope: &TrainerScope, id: Uuid) -> Result<Measurement> {
    let measurement = db
        .get::<Measurement>(collections::MEASUREMENTS, &id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Measurement"))?;

    clients::owned_client(db, scope, measurement.client_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::not_found("Measurement"),
            other => other,
        })?;

    Ok(measurement)
}

pub async fn get(db: &Db, scope: &TrainerScope, id: Uuid) -> Result<Measurement> {
    owned_measurement(db, scope, id).await
}

pub async fn delete(db: &Db, scope: &TrainerScope, id: Uuid) -> Result<()> {
    let measurement = owned_measurement(db, scope, id).await?;
    if !db
        .soft_delete(collections::MEASUREMENTS, &measurement.id.to_string())
        .await?
    {
        return Err(AppError::not_found("Measurement"));
    }

    tracing::info!(measurement_id = %measurement.id, "Measurement deleted");
    Ok(())
}
