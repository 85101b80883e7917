// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! In-memory backend for development and tests.

use super::Filter;
use crate::error::AppError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Documents keyed by `(collection, id)`.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    docs: Arc<DashMap<(String, String), Value>>,
}

impl MemoryBackend {
    fn key(collection: &str, id: &str) -> (String, String) {
        (collection.to_string(), id.to_string())
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.docs
            .get(&Self::key(collection, id))
            .map(|doc| doc.value().clone())
    }

    pub fn set(&self, collection: &str, id: &str, doc: Value) {
        self.docs.insert(Self::key(collection, id), doc);
    }

    pub fn create(&self, collection: &str, id: &str, doc: Value) -> Result<(), AppError> {
        match self.docs.entry(Self::key(collection, id)) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Document {} already exists in {}",
                id, collection
            ))),
            Entry::Vacant(slot) => {
                slot.insert(doc);
                Ok(())
            }
        }
    }

    pub fn query(&self, collection: &str, filters: &[Filter]) -> Vec<Value> {
        self.docs
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .filter(|entry| filters.iter().all(|f| f.matches(entry.value())))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_overwrites_and_create_does_not() {
        let mem = MemoryBackend::default();
        mem.set("c", "1", json!({"v": 1}));
        mem.set("c", "1", json!({"v": 2}));
        assert_eq!(mem.get("c", "1"), Some(json!({"v": 2})));

        assert!(mem.create("c", "1", json!({"v": 3})).is_err());
        assert_eq!(mem.get("c", "1"), Some(json!({"v": 2})));

        mem.create("c", "2", json!({"v": 4})).unwrap();
        assert_eq!(mem.get("c", "2"), Some(json!({"v": 4})));
    }

    #[test]
    fn test_clones_share_storage() {
        let a = MemoryBackend::default();
        let b = a.clone();
        a.set("c", "1", json!({}));
        assert!(b.get("c", "1").is_some());
    }

    #[test]
    fn test_query_applies_all_filters() {
        let mem = MemoryBackend::default();
        mem.set("c", "1", json!({"k": "a", "n": 1}));
        mem.set("c", "2", json!({"k": "a", "n": 5}));
        mem.set("c", "3", json!({"k": "b", "n": 5}));

        let found = mem.query("c", &[Filter::eq("k", "a"), Filter::gte("n", 2)]);
        assert_eq!(found, vec![json!({"k": "a", "n": 5})]);
    }
}
