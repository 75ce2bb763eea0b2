// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Document validation (C3, §4.3 `validate_document`/`validate_field_value`).
//!
//! This is a pure function: no I/O, no async. The engine calls it before
//! touching the collection's documents or indexes, and again after applying
//! update operators, so a document never enters storage without having
//! passed through here.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::entities::document::{Document, FIELD_CREATED_AT, FIELD_ID};
use crate::error::DbError;
use crate::value_objects::document_id::DocumentId;
use crate::value_objects::schema::{is_reserved_field, FieldKind, Schema};
use crate::value_objects::value::Value;

/// Normalizes a value accepted for a `date`-typed field to a canonical
/// `Value::Instant` rather than leaving a parseable-but-stringly-typed
/// value in storage (§9 Open Questions).
fn normalize_for_kind(kind: FieldKind, value: Value) -> Value {
    if kind == FieldKind::Date {
        if let Some(instant) = value.as_instant() {
            return Value::Instant(instant);
        }
    }
    value
}

/// Validates `input` against `schema` and returns a fully materialized
/// `Document` with defaults applied and reserved fields assigned.
///
/// `now` is threaded in rather than read from the clock here so callers
/// (and tests) can pin a single instant across an entire mutation.
pub fn validate_document(input: &Value, schema: &Schema, now: DateTime<Utc>) -> Result<Document, DbError> {
    let input_map = input.as_object().ok_or_else(|| DbError::validation("Document must be an object"))?;

    let mut output: BTreeMap<String, Value> = BTreeMap::new();

    for (name, def) in schema.fields() {
        match input_map.get(name) {
            Some(value) => {
                def.validate_value(name, value)?;
                output.insert(name.clone(), normalize_for_kind(def.kind, value.clone()));
            }
            None => match &def.default {
                Some(default_spec) => {
                    let materialized = default_spec.resolve()?;
                    def.validate_value(name, &materialized)?;
                    output.insert(name.clone(), normalize_for_kind(def.kind, materialized));
                }
                None => {
                    if def.required {
                        return Err(DbError::validation(format!("Required field {name} is missing")));
                    }
                }
            },
        }
    }

    for name in input_map.keys() {
        if !schema.contains(name) && !is_reserved_field(name) {
            return Err(DbError::validation(format!("Field {name} is not defined in schema")));
        }
    }

    let mut document = Document::new(output);

    match input_map.get(FIELD_ID) {
        Some(Value::String(id)) => document.set_id(DocumentId::from(id.clone())),
        Some(_) => return Err(DbError::validation("Field _id must be a string")),
        None => document.set_id(DocumentId::generate()),
    }

    if let Some(created_at) = input_map.get(FIELD_CREATED_AT) {
        document.fields_mut().insert(FIELD_CREATED_AT.to_string(), created_at.clone());
    }
    document.set_created_at_if_absent(now)?;

    document.touch_updated_at(now);

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::schema::{FieldDefinition, FieldKind};
    use std::collections::BTreeMap as Map;

    fn schema_with_required_email() -> Schema {
        let mut fields = Map::new();
        fields.insert("email".to_string(), FieldDefinition::new(FieldKind::String).with_required(true));
        fields.insert("age".to_string(), FieldDefinition::new(FieldKind::Number).with_bounds(Some(0.0), None));
        Schema::new(fields)
    }

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn assigns_id_and_timestamps_on_insert() {
        let schema = schema_with_required_email();
        let now = Utc::now();
        let input = obj(vec![("email", Value::from("a@x")), ("age", Value::from(30i64))]);
        let doc = validate_document(&input, &schema, now).unwrap();
        assert!(doc.id().is_some());
        assert_eq!(doc.created_at(), Some(now));
        assert_eq!(doc.updated_at(), Some(now));
    }

    #[test]
    fn rejects_missing_required_field() {
        let schema = schema_with_required_email();
        let input = obj(vec![("age", Value::from(30i64))]);
        assert!(validate_document(&input, &schema, Utc::now()).is_err());
    }

    #[test]
    fn rejects_unknown_field() {
        let schema = schema_with_required_email();
        let input = obj(vec![("email", Value::from("a@x")), ("extra", Value::from(1i64))]);
        assert!(validate_document(&input, &schema, Utc::now()).is_err());
    }

    #[test]
    fn carries_existing_id_through() {
        let schema = schema_with_required_email();
        let input = obj(vec![("email", Value::from("a@x")), ("_id", Value::from("fixed-id"))]);
        let doc = validate_document(&input, &schema, Utc::now()).unwrap();
        assert_eq!(doc.id().unwrap().as_str(), "fixed-id");
    }
}
