// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Schema definition grammar (C3).
//!
//! A `Schema` is a mapping from field name to `FieldDefinition`. Everything
//! here is pure declarative data — no closures are stored. The `default`
//! generator and `validate` predicate are referenced by a named identifier
//! and resolved against the static registries in this module, so a schema
//! round-trips through JSON without ever requiring executable code to be
//! part of the persisted format (§9 design note on dynamic schema flags).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DbError;
use crate::value_objects::value::Value;

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    Bytes,
}

impl FieldKind {
    pub fn parse(raw: &str) -> Result<Self, DbError> {
        match raw {
            "string" => Ok(FieldKind::String),
            "number" => Ok(FieldKind::Number),
            "boolean" => Ok(FieldKind::Boolean),
            "date" => Ok(FieldKind::Date),
            "object" => Ok(FieldKind::Object),
            "array" => Ok(FieldKind::Array),
            "bytes" => Ok(FieldKind::Bytes),
            other => Err(DbError::schema(format!("Unsupported field type '{other}'"))),
        }
    }

    /// True if `value` satisfies this kind, per §4.3's type table (a string
    /// that parses as a date is accepted for `Date`).
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => matches!(value, Value::String(_)),
            FieldKind::Number => matches!(value, Value::Number(n) if n.is_finite()),
            FieldKind::Boolean => matches!(value, Value::Bool(_)),
            FieldKind::Date => value.as_instant().is_some(),
            FieldKind::Object => matches!(value, Value::Object(_)),
            FieldKind::Array => matches!(value, Value::Array(_)),
            FieldKind::Bytes => matches!(value, Value::Bytes(_)),
        }
    }
}

/// A default value supplied when a field is absent on insert: either a
/// literal, copied as-is, or a named zero-argument generator evaluated
/// fresh at validation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultSpec {
    Literal(Value),
    Generator(String),
}

impl DefaultSpec {
    /// Materializes this default into a concrete value.
    pub fn resolve(&self) -> Result<Value, DbError> {
        match self {
            DefaultSpec::Literal(v) => Ok(v.clone()),
            DefaultSpec::Generator(name) => resolve_generator(name),
        }
    }
}

/// The static registry of named zero-argument default generators.
/// Additional identifiers can be added here without touching the
/// persisted schema format.
fn resolve_generator(name: &str) -> Result<Value, DbError> {
    match name {
        "now" => Ok(Value::Instant(Utc::now())),
        other => Err(DbError::schema(format!("Unknown default generator '{other}'"))),
    }
}

/// Distinguishes a string `default` that names a registered generator
/// (`"now"`) from one that is simply a literal string value to copy
/// verbatim. Only identifiers known to [`resolve_generator`] are treated
/// as generators; anything else is a literal.
fn is_generator_identifier(name: &str) -> bool {
    matches!(name, "now")
}

/// The static registry of named field validators. Each returns `Ok(())` on
/// success or `Err` with a human-readable reason. Arbitrary user code is
/// never persisted; only the identifier is.
fn resolve_validator(name: &str, field: &str, value: &Value) -> Result<(), DbError> {
    match name {
        "non_empty" => match value {
            Value::String(s) if s.trim().is_empty() => {
                Err(DbError::validation(format!("Field {field} must not be empty")))
            }
            Value::Array(items) if items.is_empty() => {
                Err(DbError::validation(format!("Field {field} must not be empty")))
            }
            _ => Ok(()),
        },
        "positive" => match value.as_f64() {
            Some(n) if n > 0.0 => Ok(()),
            Some(_) => Err(DbError::validation(format!("Field {field} must be positive"))),
            None => Ok(()),
        },
        "email" => match value.as_str() {
            Some(s) if s.contains('@') && !s.starts_with('@') && !s.ends_with('@') => Ok(()),
            Some(_) => Err(DbError::validation(format!("Field {field} must be a valid email"))),
            None => Ok(()),
        },
        other => Err(DbError::schema(format!("Unknown validator '{other}'"))),
    }
}

/// Declarative constraints for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub index: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minLength")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxLength")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
}

impl FieldDefinition {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            unique: false,
            encrypted: false,
            index: false,
            default: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            enum_values: None,
            validate: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub fn with_default(mut self, default: DefaultSpec) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_length_bounds(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_validator(mut self, name: impl Into<String>) -> Self {
        self.validate = Some(name.into());
        self
    }

    /// Builds a definition from a raw `Value::Object`, recognizing only
    /// the flags in §3 and ignoring any other key (forward compatibility).
    fn from_value(raw: &Value) -> Result<Self, DbError> {
        let map = raw.as_object().ok_or_else(|| DbError::schema("Field definition must be an object"))?;
        let type_name = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DbError::schema("Field definition is missing required 'type'"))?;
        let mut def = FieldDefinition::new(FieldKind::parse(type_name)?);
        def.required = map.get("required").map(|v| matches!(v, Value::Bool(true))).unwrap_or(false);
        def.unique = map.get("unique").map(|v| matches!(v, Value::Bool(true))).unwrap_or(false);
        def.encrypted = map.get("encrypted").map(|v| matches!(v, Value::Bool(true))).unwrap_or(false);
        def.index = map.get("index").map(|v| matches!(v, Value::Bool(true))).unwrap_or(false);
        def.min = map.get("min").and_then(Value::as_f64);
        def.max = map.get("max").and_then(Value::as_f64);
        def.min_length = map.get("minLength").and_then(Value::as_f64).map(|n| n as usize);
        def.max_length = map.get("maxLength").and_then(Value::as_f64).map(|n| n as usize);
        if let Some(Value::Array(values)) = map.get("enum") {
            def.enum_values = Some(values.clone());
        }
        if let Some(name) = map.get("validate").and_then(Value::as_str) {
            def.validate = Some(name.to_string());
        }
        def.default = match map.get("default") {
            None => None,
            Some(Value::String(s)) if is_generator_identifier(s) => Some(DefaultSpec::Generator(s.clone())),
            Some(literal) => Some(DefaultSpec::Literal(literal.clone())),
        };
        Ok(def)
    }

    /// Validates one field's value against this definition (§4.3
    /// `validate_field_value`). Does not check required/absence — callers
    /// handle that before calling this.
    pub fn validate_value(&self, name: &str, value: &Value) -> Result<(), DbError> {
        if !self.kind.matches(value) {
            return Err(DbError::validation(format!(
                "Field {name} expected type {:?} but got {}",
                self.kind,
                value.type_name()
            )));
        }

        if let Some(allowed) = &self.enum_values {
            if !allowed.iter().any(|v| v.strict_eq(value)) {
                return Err(DbError::validation(format!("Field {name} is not one of the allowed enum values")));
            }
        }

        if matches!(self.kind, FieldKind::Number) {
            if let Some(n) = value.as_f64() {
                if let Some(min) = self.min {
                    if n < min {
                        return Err(DbError::validation(format!("Field {name} must be >= {min}")));
                    }
                }
                if let Some(max) = self.max {
                    if n > max {
                        return Err(DbError::validation(format!("Field {name} must be <= {max}")));
                    }
                }
            }
        }

        if matches!(self.kind, FieldKind::String | FieldKind::Array) {
            if let Some(len) = value.length() {
                if let Some(min_length) = self.min_length {
                    if len < min_length {
                        return Err(DbError::validation(format!(
                            "Field {name} must have length >= {min_length}"
                        )));
                    }
                }
                if let Some(max_length) = self.max_length {
                    if len > max_length {
                        return Err(DbError::validation(format!(
                            "Field {name} must have length <= {max_length}"
                        )));
                    }
                }
            }
        }

        if let Some(validator) = &self.validate {
            resolve_validator(validator, name, value)?;
        }

        Ok(())
    }
}

/// A full collection schema: field name to definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldDefinition>,
}

impl Schema {
    pub fn new(fields: BTreeMap<String, FieldDefinition>) -> Self {
        Self { fields }
    }

    pub fn empty() -> Self {
        Self { fields: BTreeMap::new() }
    }

    /// `validate_schema` (§4.3): parses a raw schema description, where
    /// each field may be given as a bare type string (`"name": "string"`,
    /// canonicalized to `{type: "string"}`) or a full definition object.
    /// Unknown keys inside a field definition are ignored for forward
    /// compatibility; an unsupported `type` is rejected.
    pub fn parse(raw: &Value) -> Result<Self, DbError> {
        let map = raw.as_object().ok_or_else(|| DbError::schema("Schema must be an object"))?;
        let mut fields = BTreeMap::new();
        for (name, def) in map {
            let parsed = match def {
                Value::String(type_name) => FieldDefinition::new(FieldKind::parse(type_name)?),
                Value::Object(_) => FieldDefinition::from_value(def)?,
                other => {
                    return Err(DbError::schema(format!(
                        "Field '{name}' definition must be a type string or object, got {}",
                        other.type_name()
                    )))
                }
            };
            fields.insert(name.clone(), parsed);
        }
        let schema = Self { fields };
        schema.validate_self()?;
        Ok(schema)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldDefinition> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn encrypted_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|(_, def)| def.encrypted).map(|(name, _)| name.as_str())
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|(_, def)| def.index).map(|(name, _)| name.as_str())
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|(_, def)| def.unique).map(|(name, _)| name.as_str())
    }

    /// `validate_schema` (§4.3): checks the schema definition itself is
    /// sound (types known, literal defaults satisfy their own constraints).
    pub fn validate_self(&self) -> Result<(), DbError> {
        for (name, def) in &self.fields {
            if let Some(DefaultSpec::Literal(value)) = &def.default {
                def.validate_value(name, value)?;
            }
        }
        Ok(())
    }
}

/// The reserved system field names, carried through untouched from input
/// when present, synthesized otherwise (§4.3 step 4).
pub const RESERVED_FIELDS: [&str; 3] = ["_id", "createdAt", "updatedAt"];

pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_type_validates_and_enforces_bounds() {
        let def = FieldDefinition::new(FieldKind::Number).with_bounds(Some(0.0), Some(120.0));
        assert!(def.validate_value("age", &Value::from(30i64)).is_ok());
        assert!(def.validate_value("age", &Value::from(-1i64)).is_err());
        assert!(def.validate_value("age", &Value::from(200i64)).is_err());
    }

    #[test]
    fn string_type_rejects_non_string_value() {
        let def = FieldDefinition::new(FieldKind::String);
        assert!(def.validate_value("name", &Value::from("ok")).is_ok());
        assert!(def.validate_value("name", &Value::from(1i64)).is_err());
    }

    #[test]
    fn date_type_accepts_parseable_string() {
        let def = FieldDefinition::new(FieldKind::Date);
        assert!(def.validate_value("when", &Value::from("2024-01-01T00:00:00Z")).is_ok());
        assert!(def.validate_value("when", &Value::from("not a date")).is_err());
    }

    #[test]
    fn enum_constraint_is_enforced() {
        let def = FieldDefinition::new(FieldKind::String)
            .with_enum(vec![Value::from("a"), Value::from("b")]);
        assert!(def.validate_value("x", &Value::from("a")).is_ok());
        assert!(def.validate_value("x", &Value::from("z")).is_err());
    }

    #[test]
    fn named_validator_rejects_empty_string() {
        let def = FieldDefinition::new(FieldKind::String).with_validator("non_empty");
        assert!(def.validate_value("name", &Value::from("present")).is_ok());
        assert!(def.validate_value("name", &Value::from("")).is_err());
    }

    #[test]
    fn default_generator_now_produces_instant() {
        let spec = DefaultSpec::Generator("now".to_string());
        assert!(matches!(spec.resolve().unwrap(), Value::Instant(_)));
    }

    #[test]
    fn schema_self_validation_catches_bad_literal_default() {
        let def = FieldDefinition::new(FieldKind::Number)
            .with_bounds(Some(0.0), Some(10.0))
            .with_default(DefaultSpec::Literal(Value::from(100i64)));
        let mut fields = BTreeMap::new();
        fields.insert("score".to_string(), def);
        let schema = Schema::new(fields);
        assert!(schema.validate_self().is_err());
    }

    #[test]
    fn parse_canonicalizes_bare_type_strings() {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("string"));
        let raw = Value::Object(map);
        let schema = Schema::parse(&raw).unwrap();
        assert_eq!(schema.get("name").unwrap().kind, FieldKind::String);
    }

    #[test]
    fn parse_full_definitions_and_rejects_unknown_type() {
        let mut def = BTreeMap::new();
        def.insert("type".to_string(), Value::from("string"));
        def.insert("required".to_string(), Value::from(true));
        def.insert("unique".to_string(), Value::from(true));
        let mut map = BTreeMap::new();
        map.insert("email".to_string(), Value::Object(def));
        let schema = Schema::parse(&Value::Object(map)).unwrap();
        let field = schema.get("email").unwrap();
        assert!(field.required);
        assert!(field.unique);

        let mut bad = BTreeMap::new();
        bad.insert("x".to_string(), Value::from("not-a-type"));
        assert!(Schema::parse(&Value::Object(bad)).is_err());
    }
}
