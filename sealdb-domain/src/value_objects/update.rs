// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Update operator AST (§4.4): `$set`, `$unset`, `$inc`, `$push`, `$pull`.

use crate::error::DbError;
use crate::value_objects::field_path::FieldPath;
use crate::value_objects::value::Value;

#[derive(Debug, Clone)]
pub enum UpdateOp {
    Set(FieldPath, Value),
    Unset(FieldPath),
    Inc(FieldPath, f64),
    Push(FieldPath, Value),
    Pull(FieldPath, Value),
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSpec {
    ops: Vec<UpdateOp>,
}

impl UpdateSpec {
    pub fn new(ops: Vec<UpdateOp>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    /// Parses an update expressed as a `Value::Object` mapping operator to
    /// field-operation mapping, e.g. `{$set: {name: "y"}, $inc: {age: 1}}`.
    pub fn parse(value: &Value) -> Result<Self, DbError> {
        let map = value.as_object().ok_or_else(|| DbError::validation("Update must be an object"))?;
        let mut ops = Vec::new();
        for (op_name, fields) in map {
            let fields = fields
                .as_object()
                .ok_or_else(|| DbError::validation(format!("{op_name} expects an object of field operations")))?;
            for (field, operand) in fields {
                let path = FieldPath::parse(field.as_str())?;
                let op = match op_name.as_str() {
                    "$set" => UpdateOp::Set(path, operand.clone()),
                    "$unset" => UpdateOp::Unset(path),
                    "$inc" => UpdateOp::Inc(
                        path,
                        operand
                            .as_f64()
                            .ok_or_else(|| DbError::validation("$inc expects a numeric operand"))?,
                    ),
                    "$push" => UpdateOp::Push(path, operand.clone()),
                    "$pull" => UpdateOp::Pull(path, operand.clone()),
                    other => return Err(DbError::validation(format!("Unsupported update operator '{other}'"))),
                };
                ops.push(op);
            }
        }
        Ok(Self { ops })
    }

    /// Applies every operator in order to `document`, then the caller is
    /// responsible for setting `updatedAt` and re-validating (§4.4 update
    /// execution step 2a/2b are split across this function and the schema
    /// service deliberately, so the update evaluator stays schema-agnostic).
    pub fn apply(&self, document: &mut Value) -> Result<(), DbError> {
        for op in &self.ops {
            match op {
                UpdateOp::Set(path, value) => document.set_path(path.as_str(), value.clone())?,
                UpdateOp::Unset(path) => document.remove_path(path.as_str()),
                UpdateOp::Inc(path, delta) => {
                    let current = document.get_path(path.as_str()).and_then(Value::as_f64).unwrap_or(0.0);
                    document.set_path(path.as_str(), Value::Number(current + delta))?;
                }
                UpdateOp::Push(path, item) => {
                    let mut items = document
                        .get_path(path.as_str())
                        .and_then(Value::as_array)
                        .map(|items| items.to_vec())
                        .unwrap_or_default();
                    items.push(item.clone());
                    document.set_path(path.as_str(), Value::Array(items))?;
                }
                UpdateOp::Pull(path, target) => {
                    let items = document
                        .get_path(path.as_str())
                        .and_then(Value::as_array)
                        .map(|items| items.to_vec())
                        .unwrap_or_default();
                    let remaining: Vec<Value> = items.into_iter().filter(|v| !v.strict_eq(target)).collect();
                    document.set_path(path.as_str(), Value::Array(remaining))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn doc() -> Value {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("x"));
        map.insert("age".to_string(), Value::from(10i64));
        map.insert("tags".to_string(), Value::Array(vec![Value::from("a"), Value::from("b")]));
        Value::Object(map)
    }

    #[test]
    fn set_replaces_field_value() {
        let mut d = doc();
        let spec = UpdateSpec::new(vec![UpdateOp::Set(FieldPath::parse("name").unwrap(), Value::from("y"))]);
        spec.apply(&mut d).unwrap();
        assert_eq!(d.get_path("name").unwrap().as_str(), Some("y"));
    }

    #[test]
    fn inc_treats_absent_as_zero() {
        let mut d = doc();
        let spec = UpdateSpec::new(vec![UpdateOp::Inc(FieldPath::parse("score").unwrap(), 5.0)]);
        spec.apply(&mut d).unwrap();
        assert_eq!(d.get_path("score").unwrap().as_f64(), Some(5.0));
    }

    #[test]
    fn inc_composes_additively_when_applied_twice() {
        let mut d = doc();
        let spec = UpdateSpec::new(vec![UpdateOp::Inc(FieldPath::parse("age").unwrap(), 1.0)]);
        spec.apply(&mut d).unwrap();
        spec.apply(&mut d).unwrap();
        assert_eq!(d.get_path("age").unwrap().as_f64(), Some(12.0));
    }

    #[test]
    fn push_appends_and_pull_removes_strict_matches() {
        let mut d = doc();
        let push = UpdateSpec::new(vec![UpdateOp::Push(FieldPath::parse("tags").unwrap(), Value::from("c"))]);
        push.apply(&mut d).unwrap();
        assert_eq!(d.get_path("tags").unwrap().as_array().unwrap().len(), 3);

        let pull = UpdateSpec::new(vec![UpdateOp::Pull(FieldPath::parse("tags").unwrap(), Value::from("b"))]);
        pull.apply(&mut d).unwrap();
        let remaining = d.get_path("tags").unwrap().as_array().unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|v| v.as_str() != Some("b")));
    }

    #[test]
    fn unset_removes_field() {
        let mut d = doc();
        let spec = UpdateSpec::new(vec![UpdateOp::Unset(FieldPath::parse("name").unwrap())]);
        spec.apply(&mut d).unwrap();
        assert!(d.get_path("name").is_none());
    }
}
