// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Firestore backend for the document store.
//!
//! Documents are exchanged as JSON values; typing happens in [`super::Db`].

use super::Filter;
use crate::error::AppError;
use futures_util::{stream, StreamExt};
use serde_json::Value;

/// Firestore caps the number of values in an `IN` filter.
const MAX_IN_VALUES: usize = 30;

/// Maximum concurrent Firestore queries for one split `IN` lookup.
const MAX_CONCURRENT_QUERIES: usize = 8;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreBackend {
    client: firestore::FirestoreDb,
}

impl FirestoreBackend {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create-only write; an existing document maps to `Conflict`.
    pub async fn create(&self, collection: &str, id: &str, doc: &Value) -> Result<(), AppError> {
        let result: Result<(), _> = self
            .client
            .fluent()
            .insert()
            .into(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => Err(
                AppError::Conflict(format!("Document {} already exists in {}", id, collection)),
            ),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Run a conjunctive query. `IN` lists over the Firestore cap are split
    /// into several queries, run concurrently, whose results are concatenated.
    pub async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, AppError> {
        let parts = split_in_filters(filters);
        if parts.len() == 1 {
            return self.query_once(collection, &parts[0]).await;
        }

        let results = stream::iter(parts)
            .map(|part| async move { self.query_once(collection, &part).await })
            .buffer_unordered(MAX_CONCURRENT_QUERIES)
            .collect::<Vec<Result<Vec<Value>, AppError>>>()
            .await;

        let mut docs = Vec::new();
        for result in results {
            docs.extend(result?);
        }
        Ok(docs)
    }

    async fn query_once(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collection)
            .filter(|q| {
                q.for_all(filters.iter().map(|f| match f {
                    Filter::Eq(field, v) => q.field(*field).eq(v.clone()),
                    Filter::In(field, vs) => q.field(*field).is_in(Value::Array(vs.clone())),
                    Filter::IsNull(field) => q.field(*field).is_null(),
                    Filter::Gt(field, v) => q.field(*field).greater_than(v.clone()),
                    Filter::Gte(field, v) => q.field(*field).greater_than_or_equal(v.clone()),
                    Filter::Lt(field, v) => q.field(*field).less_than(v.clone()),
                    Filter::Lte(field, v) => q.field(*field).less_than_or_equal(v.clone()),
                }))
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Expand the first oversized `IN` filter into one filter set per chunk.
fn split_in_filters(filters: &[Filter]) -> Vec<Vec<Filter>> {
    let oversized = filters
        .iter()
        .position(|f| matches!(f, Filter::In(_, vs) if vs.len() > MAX_IN_VALUES));

    let Some(pos) = oversized else {
        return vec![filters.to_vec()];
    };
    let Filter::In(field, values) = &filters[pos] else {
        return vec![filters.to_vec()];
    };

    values
        .chunks(MAX_IN_VALUES)
        .flat_map(|chunk| {
            let mut part = filters.to_vec();
            part[pos] = Filter::In(field, chunk.to_vec());
            split_in_filters(&part)
        })
        .collect()
}
