// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Database layer: a document store with Firestore and in-memory backends.
//!
//! Every document carries a `deleted_at` field. Reads through [`Db`] only
//! ever see live documents (`deleted_at` null); soft deletes set the field
//! and keep the document.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreBackend;
pub use self::memory::MemoryBackend;

use crate::config::{Config, DatabaseBackend};
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Collection names as constants.
pub mod collections {
    pub const TRAINERS: &str = "trainers";
    /// Email reservations keyed by normalised email (uniqueness)
    pub const TRAINER_EMAILS: &str = "trainer_emails";
    pub const CLIENTS: &str = "clients";
    pub const SESSIONS: &str = "sessions";
    pub const MEASUREMENTS: &str = "measurements";
    pub const ASSESSMENTS: &str = "assessments";
    pub const PHOTO_GROUPS: &str = "photo_groups";
    pub const PHOTOS: &str = "photos";
}

/// Soft-delete marker field present on every stored document.
pub const DELETED_AT: &str = "deleted_at";

/// A single predicate over a top-level document field. Filters combine with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
    IsNull(&'static str),
    Gt(&'static str, Value),
    Gte(&'static str, Value),
    Lt(&'static str, Value),
    Lte(&'static str, Value),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Serialize) -> Self {
        Filter::Eq(field, to_value(value))
    }

    pub fn is_in<I, V>(field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        Filter::In(field, values.into_iter().map(to_value).collect())
    }

    pub fn gt(field: &'static str, value: impl Serialize) -> Self {
        Filter::Gt(field, to_value(value))
    }

    pub fn gte(field: &'static str, value: impl Serialize) -> Self {
        Filter::Gte(field, to_value(value))
    }

    pub fn lt(field: &'static str, value: impl Serialize) -> Self {
        Filter::Lt(field, to_value(value))
    }

    pub fn lte(field: &'static str, value: impl Serialize) -> Self {
        Filter::Lte(field, to_value(value))
    }

    /// Evaluate against a JSON document (memory backend).
    pub fn matches(&self, doc: &Value) -> bool {
        let field = |name: &str| doc.get(name).unwrap_or(&Value::Null);
        match self {
            Filter::Eq(name, v) => field(name) == v,
            Filter::In(name, vs) => vs.contains(field(name)),
            Filter::IsNull(name) => field(name).is_null(),
            Filter::Gt(name, v) => compare(field(name), v) == Some(Ordering::Greater),
            Filter::Gte(name, v) => matches!(
                compare(field(name), v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lt(name, v) => compare(field(name), v) == Some(Ordering::Less),
            Filter::Lte(name, v) => matches!(
                compare(field(name), v),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

fn to_value(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Ordering between two scalars of the same kind; `None` across kinds.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreBackend),
    Memory(MemoryBackend),
}

/// Database handle shared by all services. Cheap to clone.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

impl Db {
    /// Connect to the backend named in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.database_backend {
            DatabaseBackend::Firestore => Self::firestore(&config.gcp_project_id).await,
            DatabaseBackend::Memory => {
                tracing::warn!("Using in-memory database; data is lost on restart");
                Ok(Self::memory())
            }
        }
    }

    pub async fn firestore(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreBackend::new(project_id).await?),
        })
    }

    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryBackend::default()),
        }
    }

    /// Fetch a live document by ID.
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        match self.get_raw(collection, id).await? {
            Some(doc) if is_live(&doc) => decode(doc).map(Some),
            _ => Ok(None),
        }
    }

    /// Fetch a document by ID including soft-deleted ones, undecoded.
    pub async fn get_raw(&self, collection: &str, id: &str) -> Result<Option<Value>, AppError> {
        match &self.backend {
            Backend::Firestore(fs) => fs.get(collection, id).await,
            Backend::Memory(mem) => Ok(mem.get(collection, id)),
        }
    }

    /// Create or overwrite a live document.
    pub async fn put<T: Serialize>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError> {
        let doc = encode(doc)?;
        match &self.backend {
            Backend::Firestore(fs) => fs.set(collection, id, &doc).await,
            Backend::Memory(mem) => {
                mem.set(collection, id, doc);
                Ok(())
            }
        }
    }

    /// Create a document; `Conflict` if the ID is already taken.
    pub async fn insert<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        doc: &T,
    ) -> Result<(), AppError> {
        let doc = encode(doc)?;
        match &self.backend {
            Backend::Firestore(fs) => fs.create(collection, id, &doc).await,
            Backend::Memory(mem) => mem.create(collection, id, doc),
        }
    }

    /// All live documents matching every filter, in no particular order.
    pub async fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        mut filters: Vec<Filter>,
    ) -> Result<Vec<T>, AppError> {
        // An empty IN list matches nothing (and Firestore rejects it).
        if filters
            .iter()
            .any(|f| matches!(f, Filter::In(_, values) if values.is_empty()))
        {
            return Ok(Vec::new());
        }

        filters.push(Filter::IsNull(DELETED_AT));
        let docs = match &self.backend {
            Backend::Firestore(fs) => fs.query(collection, &filters).await?,
            Backend::Memory(mem) => mem.query(collection, &filters),
        };

        docs.into_iter().map(decode).collect()
    }

    /// Mark a live document deleted. Returns `false` if there was none.
    pub async fn soft_delete(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        let Some(mut doc) = self.get_raw(collection, id).await? else {
            return Ok(false);
        };
        if !is_live(&doc) {
            return Ok(false);
        }

        let now = crate::time_utils::format_utc_rfc3339(chrono::Utc::now());
        if let Some(fields) = doc.as_object_mut() {
            fields.insert(DELETED_AT.to_string(), Value::String(now));
        }

        match &self.backend {
            Backend::Firestore(fs) => fs.set(collection, id, &doc).await?,
            Backend::Memory(mem) => mem.set(collection, id, doc),
        }

        tracing::debug!(collection, id, "Soft-deleted document");
        Ok(true)
    }
}

fn is_live(doc: &Value) -> bool {
    doc.get(DELETED_AT).map_or(true, Value::is_null)
}

fn encode<T: Serialize>(doc: &T) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(doc)
        .map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))?;
    let fields = value
        .as_object_mut()
        .ok_or_else(|| AppError::Database("Documents must be JSON objects".to_string()))?;
    fields.insert(DELETED_AT.to_string(), Value::Null);
    Ok(value)
}

fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, AppError> {
    serde_json::from_value(doc)
        .map_err(|e| AppError::Database(format!("Malformed document: {}", e)))
}
