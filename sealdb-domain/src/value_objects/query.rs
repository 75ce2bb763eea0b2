// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Query filter AST (§4.4).
//!
//! A query is a mapping from field path to either a literal value (implicit
//! equality) or an operator mapping (`$eq`, `$gt`, `$in`, `$regex`, ...),
//! plus the top-level logical combinators `$and`/`$or`. Callers build a
//! `Filter` either programmatically or by parsing a `Value::Object` of this
//! shape with [`Filter::parse`].

use crate::error::DbError;
use crate::value_objects::field_path::FieldPath;
use crate::value_objects::value::Value;

/// One field-level comparison.
#[derive(Debug, Clone)]
pub enum FieldOp {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Regex { pattern: String, case_insensitive: bool },
}

/// A boolean combination of field predicates.
#[derive(Debug, Clone)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Field(FieldPath, FieldOp),
    /// The empty query `{}` matches every document.
    MatchAll,
}

impl Filter {
    /// Parses a query expressed as a `Value::Object`, e.g.
    /// `{v: {$gte: 2, $lt: 5}}` or `{$or: [{a: 1}, {b: 2}]}`.
    pub fn parse(value: &Value) -> Result<Self, DbError> {
        let map = match value {
            Value::Object(map) => map,
            _ => return Err(DbError::validation("Query must be an object")),
        };
        if map.is_empty() {
            return Ok(Filter::MatchAll);
        }

        let mut clauses = Vec::with_capacity(map.len());
        for (key, val) in map {
            match key.as_str() {
                "$and" => clauses.push(Filter::And(parse_subqueries(val)?)),
                "$or" => clauses.push(Filter::Or(parse_subqueries(val)?)),
                field => {
                    let path = FieldPath::parse(field)?;
                    clauses.extend(parse_field_clauses(path, val)?);
                }
            }
        }

        if clauses.len() == 1 {
            Ok(clauses.into_iter().next().unwrap())
        } else {
            Ok(Filter::And(clauses))
        }
    }
}

fn parse_subqueries(value: &Value) -> Result<Vec<Filter>, DbError> {
    let items = value
        .as_array()
        .ok_or_else(|| DbError::validation("$and/$or expects an array of sub-queries"))?;
    items.iter().map(Filter::parse).collect()
}

/// A field's clause is either a literal (implicit `$eq`) or an operator
/// mapping; an operator mapping may carry several operators at once
/// (`{$gte: 2, $lt: 5}`), each becoming its own `Filter::Field`.
fn parse_field_clauses(path: FieldPath, value: &Value) -> Result<Vec<Filter>, DbError> {
    let Some(ops) = value.as_object() else {
        return Ok(vec![Filter::Field(path, FieldOp::Eq(value.clone()))]);
    };

    if !ops.keys().next().is_some_and(|k| k.starts_with('$')) {
        // An object literal that happens not to use operator keys is still
        // a plain equality target (e.g. matching a nested-object field).
        return Ok(vec![Filter::Field(path, FieldOp::Eq(value.clone()))]);
    }

    let mut options = None;
    if let Some(opts) = ops.get("$options") {
        options = opts.as_str().map(|s| s.to_string());
    }

    let mut clauses = Vec::new();
    for (op_name, operand) in ops {
        let op = match op_name.as_str() {
            "$eq" => FieldOp::Eq(operand.clone()),
            "$ne" => FieldOp::Ne(operand.clone()),
            "$gt" => FieldOp::Gt(operand.clone()),
            "$gte" => FieldOp::Gte(operand.clone()),
            "$lt" => FieldOp::Lt(operand.clone()),
            "$lte" => FieldOp::Lte(operand.clone()),
            "$in" => FieldOp::In(
                operand
                    .as_array()
                    .ok_or_else(|| DbError::validation("$in expects an array"))?
                    .to_vec(),
            ),
            "$nin" => FieldOp::Nin(
                operand
                    .as_array()
                    .ok_or_else(|| DbError::validation("$nin expects an array"))?
                    .to_vec(),
            ),
            "$regex" => FieldOp::Regex {
                pattern: operand
                    .as_str()
                    .ok_or_else(|| DbError::validation("$regex expects a string pattern"))?
                    .to_string(),
                case_insensitive: options.as_deref() == Some("i"),
            },
            "$options" => continue,
            other => return Err(DbError::validation(format!("Unsupported query operator '{other}'"))),
        };
        clauses.push(Filter::Field(path.clone(), op));
    }
    Ok(clauses)
}

/// Sort direction, `+1` or `-1` per §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct SortSpec {
    pub path: FieldPath,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Vec<SortSpec>,
    pub skip: usize,
    pub limit: Option<usize>,
    pub projection: Option<Vec<FieldPath>>,
}

impl FindOptions {
    pub fn limited(limit: usize) -> Self {
        Self { limit: Some(limit), ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<BTreeMap<_, _>>())
    }

    #[test]
    fn empty_query_matches_all() {
        let filter = Filter::parse(&Value::Object(BTreeMap::new())).unwrap();
        assert!(matches!(filter, Filter::MatchAll));
    }

    #[test]
    fn literal_value_is_implicit_equality() {
        let query = obj(vec![("email", Value::from("a@x"))]);
        let filter = Filter::parse(&query).unwrap();
        match filter {
            Filter::Field(path, FieldOp::Eq(v)) => {
                assert_eq!(path.as_str(), "email");
                assert_eq!(v.as_str(), Some("a@x"));
            }
            other => panic!("expected equality field filter, got {other:?}"),
        }
    }

    #[test]
    fn range_operators_produce_multiple_clauses() {
        let query = obj(vec![(
            "v",
            obj(vec![("$gte", Value::from(2i64)), ("$lt", Value::from(5i64))]),
        )]);
        let filter = Filter::parse(&query).unwrap();
        match filter {
            Filter::And(clauses) => assert_eq!(clauses.len(), 2),
            other => panic!("expected And of two range clauses, got {other:?}"),
        }
    }

    #[test]
    fn logical_or_parses_subqueries() {
        let query = obj(vec![(
            "$or",
            Value::Array(vec![obj(vec![("a", Value::from(1i64))]), obj(vec![("b", Value::from(2i64))])]),
        )]);
        let filter = Filter::parse(&query).unwrap();
        assert!(matches!(filter, Filter::Or(clauses) if clauses.len() == 2));
    }

    #[test]
    fn regex_options_apply_case_insensitivity() {
        let query = obj(vec![(
            "name",
            obj(vec![("$regex", Value::from("^a")), ("$options", Value::from("i"))]),
        )]);
        let filter = Filter::parse(&query).unwrap();
        match filter {
            Filter::Field(_, FieldOp::Regex { case_insensitive, .. }) => assert!(case_insensitive),
            other => panic!("expected regex field filter, got {other:?}"),
        }
    }
}
