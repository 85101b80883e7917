// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Sparse update field.
//!
//! A `Patch<T>` keeps "not mentioned" apart from "explicitly set to null",
//! which a plain `Option<T>` collapses. Request structs mark every patch
//! field with `#[serde(default)]` so an absent key lands as `Missing`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Key absent from the payload: keep the stored value.
    Missing,
    /// Key present with `null`: clear the stored value.
    Null,
    /// Key present with a value: replace the stored value.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(d)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// Apply to a nullable field.
    pub fn apply_to_option(self, target: &mut Option<T>) {
        match self {
            Patch::Missing => {}
            Patch::Null => *target = None,
            Patch::Value(v) => *target = Some(v),
        }
    }

    /// Apply to a required field. `Null` is rejected with `field`'s name.
    pub fn apply_required(self, target: &mut T, field: &str) -> Result<(), String> {
        match self {
            Patch::Missing => Ok(()),
            Patch::Null => Err(format!("{field} cannot be null")),
            Patch::Value(v) => {
                *target = v;
                Ok(())
            }
        }
    }
}

/// `deserialize_with` adapter for timestamp patches in the stored RFC3339 form.
pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Patch<DateTime<Utc>>, D::Error> {
    Ok(match crate::time_utils::rfc3339::option::deserialize(d)? {
        Some(at) => Patch::Value(at),
        None => Patch::Null,
    })
}

impl Patch<String> {
    /// Apply to a text field where `null` means empty.
    pub fn apply_to_text(self, target: &mut String) {
        match self {
            Patch::Missing => {}
            Patch::Null => target.clear(),
            Patch::Value(v) => *target = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        notes: Patch<String>,
        #[serde(default)]
        phone: Patch<String>,
        #[serde(default)]
        size: Patch<i64>,
        #[serde(default, deserialize_with = "timestamp")]
        at: Patch<DateTime<Utc>>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let body: Body = serde_json::from_str(r#"{"notes": "hi", "phone": null}"#).unwrap();
        assert_eq!(body.notes, Patch::Value("hi".to_string()));
        assert_eq!(body.phone, Patch::Null);
        assert!(body.size.is_missing());
        assert!(body.at.is_missing());
    }

    #[test]
    fn test_timestamp_patch() {
        let body: Body = serde_json::from_str(r#"{"at": "2026-03-01T10:00:00+02:00"}"#).unwrap();
        assert_eq!(
            body.at,
            Patch::Value(crate::time_utils::parse_rfc3339("2026-03-01T08:00:00Z").unwrap())
        );
        let body: Body = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert_eq!(body.at, Patch::Null);
        assert!(serde_json::from_str::<Body>(r#"{"at": "yesterday"}"#).is_err());
    }

    #[test]
    fn test_apply_required_rejects_null() {
        let mut size = 10;
        assert!(Patch::<i64>::Null.apply_required(&mut size, "size").is_err());
        Patch::Value(12).apply_required(&mut size, "size").unwrap();
        Patch::Missing.apply_required(&mut size, "size").unwrap();
        assert_eq!(size, 12);
    }

    #[test]
    fn test_apply_to_option_and_text() {
        let mut date = Some(3);
        Patch::Missing.apply_to_option(&mut date);
        assert_eq!(date, Some(3));
        Patch::Null.apply_to_option(&mut date);
        assert_eq!(date, None);

        let mut phone = "555".to_string();
        Patch::Null.apply_to_text(&mut phone);
        assert!(phone.is_empty());
    }
}
