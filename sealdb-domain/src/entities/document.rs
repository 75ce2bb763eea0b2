// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A single document: a field map owned by exactly one collection,
//! identified by `_id` within it (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DbError;
use crate::value_objects::document_id::DocumentId;
use crate::value_objects::value::Value;

pub const FIELD_ID: &str = "_id";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

/// A document's field map, including the three reserved system fields.
///
/// Stored fields flagged `encrypted` in the schema hold ciphertext
/// (base64 of `iv || AES-256-CBC(json(value))`) while resident in this
/// struct. Encryption and decryption are an infrastructure concern (they
/// need a `CryptoService`), so the application layer's `DatabaseEngine`
/// swaps fields between plaintext and ciphertext form around calls into
/// this aggregate; `Document` itself never knows which state it is in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut BTreeMap<String, Value> {
        &mut self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn id(&self) -> Option<DocumentId> {
        self.fields.get(FIELD_ID).and_then(Value::as_str).map(DocumentId::from)
    }

    pub fn set_id(&mut self, id: DocumentId) {
        self.fields.insert(FIELD_ID.to_string(), Value::from(id.into_string()));
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.fields.get(FIELD_CREATED_AT).and_then(Value::as_instant)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.fields.get(FIELD_UPDATED_AT).and_then(Value::as_instant)
    }

    pub fn touch_updated_at(&mut self, now: DateTime<Utc>) {
        self.fields.insert(FIELD_UPDATED_AT.to_string(), Value::Instant(now));
    }

    /// Assigns `createdAt` to `now` if absent; if present, normalizes it to
    /// a canonical instant rather than leaving a date-like string in place
    /// (§9 Open Questions), and rejects values that do not parse as a date
    /// at all rather than silently carrying them through.
    pub fn set_created_at_if_absent(&mut self, now: DateTime<Utc>) -> Result<(), DbError> {
        match self.fields.get(FIELD_CREATED_AT) {
            None => {
                self.fields.insert(FIELD_CREATED_AT.to_string(), Value::Instant(now));
                Ok(())
            }
            Some(v) => match v.as_instant() {
                Some(instant) => {
                    self.fields.insert(FIELD_CREATED_AT.to_string(), Value::Instant(instant));
                    Ok(())
                }
                None => Err(DbError::validation("Field createdAt must be a date")),
            },
        }
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn from_value(value: Value) -> Result<Self, DbError> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            _ => Err(DbError::document("Document must be an object")),
        }
    }

    /// A deep clone for returning to callers (§5: "engine returns deep
    /// copies to callers"; client mutation of a returned value must never
    /// corrupt engine state).
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_rejects_non_date_value_on_carry_through() {
        let mut doc = Document::new(BTreeMap::new());
        doc.fields_mut().insert(FIELD_CREATED_AT.to_string(), Value::from("not a date"));
        assert!(doc.set_created_at_if_absent(Utc::now()).is_err());
    }

    #[test]
    fn created_at_synthesized_when_absent() {
        let mut doc = Document::new(BTreeMap::new());
        let now = Utc::now();
        doc.set_created_at_if_absent(now).unwrap();
        assert_eq!(doc.created_at(), Some(now));
    }
}
