// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Client registry. Every lookup is scoped to the calling trainer; another
//! trainer's client is reported exactly like a missing one.

use crate::db::{collections, Db, Filter};
use crate::error::{AppError, Result};
use crate::middleware::TrainerScope;
use crate::models::patch::{self, Patch};
use crate::models::{Client, ClientView, PackageSummary};
use crate::services::packages;
use crate::time_utils::rfc3339;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub total_package_size: i64,
    #[serde(default, with = "rfc3339::option")]
    pub package_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

/// Sparse client update; only keys present in the body change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClientRequest {
    #[serde(default)]
    pub first_name: Patch<String>,
    #[serde(default)]
    pub last_name: Patch<String>,
    #[serde(default)]
    pub phone: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub total_package_size: Patch<i64>,
    #[serde(default, deserialize_with = "patch::timestamp")]
    pub package_start_date: Patch<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Patch<String>,
}

/// Fetch a live client owned by the caller.
pub async fn owned_client(db: &Db, scope: &TrainerScope, client_id: Uuid) -> Result<Client> {
    db.get::<Client>(collections::CLIENTS, &client_id.to_string())
        .await?
        .filter(|c| c.trainer_id == scope.trainer_id())
        .ok_or_else(|| AppError::not_found("Client"))
}

/// All live clients owned by the caller, unordered.
pub async fn owned_clients(db: &Db, scope: &TrainerScope) -> Result<Vec<Client>> {
    db.query(
        collections::CLIENTS,
        vec![Filter::eq("trainer_id", scope.trainer_id())],
    )
    .await
}

/// List clients with their package counts, newest first.
pub async fn list(db: &Db, scope: &TrainerScope) -> Result<Vec<ClientView>> {
    let mut clients = owned_clients(db, scope).await?;
    clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
    let mut stats = packages::stats_by_client(db, &ids).await?;

    tracing::debug!(trainer_id = %scope.trainer_id(), count = clients.len(), "Listed clients");

    Ok(clients
        .into_iter()
        .map(|client| {
            let counts = stats.remove(&client.id).unwrap_or_default();
            ClientView {
                package: PackageSummary::new(client.total_package_size, counts),
                client,
            }
        })
        .collect())
}

pub async fn create(db: &Db, scope: &TrainerScope, req: CreateClientRequest) -> Result<Client> {
    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation(
            "first_name and last_name are required".to_string(),
        ));
    }
    if req.total_package_size < 0 {
        return Err(AppError::Validation(
            "total_package_size cannot be negative".to_string(),
        ));
    }

    let now = Utc::now();
    let client = Client {
        id: Uuid::new_v4(),
        trainer_id: scope.trainer_id(),
        first_name,
        last_name,
        phone: req.phone,
        email: req.email,
        total_package_size: req.total_package_size,
        package_start_date: req.package_start_date,
        notes: req.notes,
        created_at: now,
        updated_at: now,
    };

    db.put(collections::CLIENTS, &client.id.to_string(), &client)
        .await?;

    tracing::info!(trainer_id = %scope.trainer_id(), client_id = %client.id, "Client created");
    Ok(client)
}

pub async fn get(db: &Db, scope: &TrainerScope, client_id: Uuid) -> Result<ClientView> {
    let client = owned_client(db, scope, client_id).await?;
    let counts = packages::stats(db, client.id).await?;
    Ok(ClientView {
        package: PackageSummary::new(client.total_package_size, counts),
        client,
    })
}

pub async fn update(
    db: &Db,
    scope: &TrainerScope,
    client_id: Uuid,
    req: UpdateClientRequest,
) -> Result<Client> {
    let mut client = owned_client(db, scope, client_id).await?;

    req.first_name
        .apply_required(&mut client.first_name, "first_name")
        .map_err(AppError::Validation)?;
    req.last_name
        .apply_required(&mut client.last_name, "last_name")
        .map_err(AppError::Validation)?;
    req.total_package_size
        .apply_required(&mut client.total_package_size, "total_package_size")
        .map_err(AppError::Validation)?;
    req.phone.apply_to_text(&mut client.phone);
    req.email.apply_to_text(&mut client.email);
    req.notes.apply_to_text(&mut client.notes);
    req.package_start_date
        .apply_to_option(&mut client.package_start_date);

    if client.first_name.trim().is_empty() || client.last_name.trim().is_empty() {
        return Err(AppError::Validation(
            "first_name and last_name cannot be empty".to_string(),
        ));
    }
    if client.total_package_size < 0 {
        return Err(AppError::Validation(
            "total_package_size cannot be negative".to_string(),
        ));
    }

    client.updated_at = Utc::now();
    db.put(collections::CLIENTS, &client.id.to_string(), &client)
        .await?;

    tracing::info!(client_id = %client.id, "Client updated");
    Ok(client)
}

/// Soft delete. The client's sessions and history stay in storage.
pub async fn delete(db: &Db, scope: &TrainerScope, client_id: Uuid) -> Result<()> {
    let client = owned_client(db, scope, client_id).await?;
    if !db
        .soft_delete(collections::CLIENTS, &client.id.to_string())
        .await?
    {
        return Err(AppError::not_found("Client"));
    }

    tracing::info!(trainer_id = %scope.trainer_id(), client_id = %client.id, "Client deleted");
    Ok(())
}
