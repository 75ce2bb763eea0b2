// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Document Value
//!
//! `Value` is the runtime-typed tagged union every document field holds. It
//! mirrors the source system's dynamically-typed JSON-like documents while
//! giving Rust code an exhaustive, matchable representation: numeric ordering
//! and equality are only ever defined within the `Number` tag, strings compare
//! by codepoint, and `Bytes`/`Instant` are distinct tags rather than encoded
//! strings so the schema layer can type-check them directly.
//!
//! `Value` round-trips through `serde_json::Value` for storage in the
//! gzip+encrypted container (§4.2) and for the portable export tree (§6),
//! but keeps `Instant` and `Bytes` as first-class tags in memory so the
//! evaluator (§4.4) and schema validator (§4.3) never have to re-sniff a
//! plain JSON string to tell a date from a date-like string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DbError;

/// A single document field value.
///
/// Variant order here is intentional: it defines the type-rank used when two
/// values of *different* tags are compared under `$lt`/`$gt` — per spec,
/// mixed-type comparisons never match, so `partial_cmp` returns `None`
/// whenever the tags differ rather than falling back to the rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Instant(DateTime<Utc>),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Instant(_) => "date",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Length used for `minLength`/`maxLength` checks: string char count or
    /// array element count. Any other type has no length.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Tries to interpret the value as a UTC instant: native `Instant`
    /// values pass through, RFC3339 strings are parsed, everything else
    /// fails. Used both by the schema validator (a string that parses as a
    /// date is accepted for `type: date`) and by the `date` normalization
    /// pass on ingress (§9 Open Questions).
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Instant(dt) => Some(*dt),
            Value::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn stringify(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Value::String(s) => s.clone(),
            Value::Instant(dt) => dt.to_rfc3339(),
            Value::Bytes(b) => hex::encode(b),
            Value::Array(_) | Value::Object(_) => {
                serde_json::to_string(&self.to_json()).unwrap_or_default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Instant(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Bytes(b) => serde_json::Value::String(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                b,
            )),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => {
                serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }

    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect())
            }
        }
    }

    /// Navigates a dotted field path (`a.b.c`) through nested objects. A
    /// missing key or a non-object intermediate both yield `None`
    /// ("undefined" in spec terms) rather than an error.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            match current {
                Value::Object(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Sets a dotted field path, creating intermediate objects as needed.
    /// Fails if an intermediate segment already holds a non-object value.
    pub fn set_path(&mut self, path: &str, value: Value) -> Result<(), DbError> {
        let segments: Vec<&str> = path.split('.').collect();
        Self::set_path_segments(self, &segments, value)
    }

    fn set_path_segments(current: &mut Value, segments: &[&str], value: Value) -> Result<(), DbError> {
        let (head, rest) = segments.split_first().ok_or_else(|| DbError::validation("Empty field path"))?;
        if !matches!(current, Value::Object(_)) {
            *current = Value::Object(BTreeMap::new());
        }
        let map = current.as_object_mut().expect("just coerced to object");
        if rest.is_empty() {
            map.insert((*head).to_string(), value);
            return Ok(());
        }
        let entry = map.entry((*head).to_string()).or_insert_with(|| Value::Object(BTreeMap::new()));
        Self::set_path_segments(entry, rest, value)
    }

    /// Removes a dotted field path. No-op if the path does not exist.
    pub fn remove_path(&mut self, path: &str) {
        let segments: Vec<&str> = path.split('.').collect();
        Self::remove_path_segments(self, &segments);
    }

    fn remove_path_segments(current: &mut Value, segments: &[&str]) {
        let Some((head, rest)) = segments.split_first() else { return };
        let Some(map) = current.as_object_mut() else { return };
        if rest.is_empty() {
            map.remove(*head);
            return;
        }
        if let Some(child) = map.get_mut(*head) {
            Self::remove_path_segments(child, rest);
        }
    }

    /// Strict equality: numeric equality by value, strings by codepoint,
    /// structural equality for arrays/objects. Mixed types are never equal.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Instant(a), Value::Instant(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.strict_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|bv| v.strict_eq(bv)))
            }
            _ => false,
        }
    }

    /// Ordered comparison for `$gt`/`$gte`/`$lt`/`$lte`. Returns `None` for
    /// mixed types, matching spec's "mixed-type comparisons never match".
    pub fn partial_compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Instant(a), Value::Instant(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Instant(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_nested_path() {
        let mut doc = Value::Object(BTreeMap::new());
        doc.set_path("a.b.c", Value::from(42i64)).unwrap();
        assert_eq!(doc.get_path("a.b.c").unwrap().as_f64(), Some(42.0));
        assert!(doc.get_path("a.b.missing").is_none());
        assert!(doc.get_path("a.x.y").is_none());
    }

    #[test]
    fn remove_path_is_noop_when_missing() {
        let mut doc = Value::Object(BTreeMap::new());
        doc.remove_path("nowhere.here");
        assert!(matches!(doc, Value::Object(ref m) if m.is_empty()));
    }

    #[test]
    fn mixed_type_comparisons_never_match() {
        let n = Value::from(5i64);
        let s = Value::from("5");
        assert_eq!(n.partial_compare(&s), None);
        assert!(!n.strict_eq(&s));
    }

    #[test]
    fn numeric_equality_by_value() {
        assert!(Value::from(3.0).strict_eq(&Value::from(3i64)));
    }

    #[test]
    fn string_parses_as_instant_for_date_type() {
        let v = Value::from("2024-01-01T00:00:00Z");
        assert!(v.as_instant().is_some());
        assert!(Value::from("not a date").as_instant().is_none());
    }
}
