// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The query/update evaluator (C4): predicate matching, sorting, and
//! pagination over already-decrypted document snapshots.
//!
//! This is pure, synchronous, allocation-light code — the engine decrypts
//! any `encrypted` fields into a scratch copy before calling [`matches`] or
//! [`execute_find`], since the evaluator never touches the crypto service
//! directly (§4.4 step 2: "Decrypt encrypted fields on the in-memory copy
//! used for matching.").

use regex::RegexBuilder;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::entities::document::FIELD_ID;
use crate::value_objects::field_path::FieldPath;
use crate::value_objects::query::{FieldOp, Filter, FindOptions, SortDirection};
use crate::value_objects::value::Value;

/// Does `document` satisfy `filter`? Missing fields compare unequal to any
/// concrete value under every operator except `$ne`, which is true for a
/// missing field (§4.4).
pub fn matches(document: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::MatchAll => true,
        Filter::And(clauses) => clauses.iter().all(|c| matches(document, c)),
        Filter::Or(clauses) => clauses.iter().any(|c| matches(document, c)),
        Filter::Field(path, op) => matches_field(document, path, op),
    }
}

fn matches_field(document: &Value, path: &FieldPath, op: &FieldOp) -> bool {
    let actual = document.get_path(path.as_str());
    match op {
        FieldOp::Eq(expected) => actual.is_some_and(|v| v.strict_eq(expected)),
        FieldOp::Ne(expected) => !actual.is_some_and(|v| v.strict_eq(expected)),
        FieldOp::Gt(expected) => compare(actual, expected) == Some(Ordering::Greater),
        FieldOp::Gte(expected) => matches!(compare(actual, expected), Some(Ordering::Greater | Ordering::Equal)),
        FieldOp::Lt(expected) => compare(actual, expected) == Some(Ordering::Less),
        FieldOp::Lte(expected) => matches!(compare(actual, expected), Some(Ordering::Less | Ordering::Equal)),
        FieldOp::In(candidates) => actual.is_some_and(|v| candidates.iter().any(|c| v.strict_eq(c))),
        FieldOp::Nin(candidates) => !actual.is_some_and(|v| candidates.iter().any(|c| v.strict_eq(c))),
        FieldOp::Regex { pattern, case_insensitive } => {
            let Some(actual) = actual else { return false };
            let Ok(re) = RegexBuilder::new(pattern).case_insensitive(*case_insensitive).build() else {
                return false;
            };
            re.is_match(&actual.stringify())
        }
    }
}

fn compare(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    actual?.partial_compare(expected)
}

/// Sorts `documents` by each `(path, direction)` pair in order: undefined
/// sorts before defined, ties broken by the next key (§4.4 step 4).
pub fn sort_documents<'a, T>(documents: &mut [T], sort: &[crate::value_objects::query::SortSpec], accessor: impl Fn(&T) -> &'a Value + Copy)
where
    T: 'a,
{
    documents.sort_by(|a, b| {
        for spec in sort {
            let av = accessor(a).get_path(spec.path.as_str());
            let bv = accessor(b).get_path(spec.path.as_str());
            let ordering = match (av, bv) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => x.partial_compare(y).unwrap_or(Ordering::Equal),
            };
            let ordering = if spec.direction == SortDirection::Descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Applies `skip` then `limit` to an already-filtered-and-sorted sequence
/// (§4.4 step 5).
pub fn paginate<T>(items: Vec<T>, options: &FindOptions) -> Vec<T> {
    let skipped: Vec<T> = items.into_iter().skip(options.skip).collect();
    match options.limit {
        Some(limit) => skipped.into_iter().take(limit).collect(),
        None => skipped,
    }
}

/// Restricts `document` to the field paths named in `projection`, always
/// keeping `_id` (§4.4 step 6). `None` returns the document unchanged.
pub fn project(document: &Value, projection: Option<&[FieldPath]>) -> Value {
    let Some(paths) = projection else {
        return document.clone();
    };
    let mut result = Value::Object(BTreeMap::new());
    if let Some(id) = document.get_path(FIELD_ID) {
        let _ = result.set_path(FIELD_ID, id.clone());
    }
    for path in paths {
        if let Some(value) = document.get_path(path.as_str()) {
            let _ = result.set_path(path.as_str(), value.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::query::SortSpec;
    use std::collections::BTreeMap;

    fn doc(v: i64) -> Value {
        let mut map = BTreeMap::new();
        map.insert("v".to_string(), Value::from(v));
        Value::Object(map)
    }

    #[test]
    fn range_query_matches_documents_in_bounds() {
        let query_path = FieldPath::parse("v").unwrap();
        let filter = Filter::And(vec![
            Filter::Field(query_path.clone(), FieldOp::Gte(Value::from(2i64))),
            Filter::Field(query_path, FieldOp::Lt(Value::from(5i64))),
        ]);
        let docs: Vec<Value> = (1..=5).map(doc).collect();
        let matched: Vec<i64> = docs
            .iter()
            .filter(|d| matches(d, &filter))
            .map(|d| d.get_path("v").unwrap().as_f64().unwrap() as i64)
            .collect();
        assert_eq!(matched, vec![2, 3, 4]);
    }

    #[test]
    fn missing_field_is_unequal_except_under_ne() {
        let empty = Value::Object(BTreeMap::new());
        let path = FieldPath::parse("v").unwrap();
        assert!(!matches_field(&empty, &path, &FieldOp::Eq(Value::from(1i64))));
        assert!(matches_field(&empty, &path, &FieldOp::Ne(Value::from(1i64))));
    }

    #[test]
    fn sort_is_stable_and_monotone() {
        let mut docs: Vec<Value> = vec![doc(3), doc(1), doc(2)];
        let sort = vec![SortSpec { path: FieldPath::parse("v").unwrap(), direction: SortDirection::Ascending }];
        sort_documents(&mut docs, &sort, |d| d);
        let values: Vec<i64> = docs.iter().map(|d| d.get_path("v").unwrap().as_f64().unwrap() as i64).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn skip_and_limit_apply_in_order() {
        let docs: Vec<i64> = (1..=10).collect();
        let options = FindOptions { skip: 2, limit: Some(3), ..Default::default() };
        assert_eq!(paginate(docs, &options), vec![3, 4, 5]);
    }

    #[test]
    fn projection_keeps_only_named_paths_and_always_keeps_id() {
        let mut map = BTreeMap::new();
        map.insert(FIELD_ID.to_string(), Value::from("abc"));
        map.insert("name".to_string(), Value::from("x"));
        map.insert("age".to_string(), Value::from(30i64));
        let document = Value::Object(map);

        let projected = project(&document, Some(&[FieldPath::parse("name").unwrap()]));
        assert_eq!(projected.get_path("name").unwrap().as_str(), Some("x"));
        assert_eq!(projected.get_path(FIELD_ID).unwrap().as_str(), Some("abc"));
        assert!(projected.get_path("age").is_none());
    }

    #[test]
    fn no_projection_returns_the_document_unchanged() {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::from("x"));
        let document = Value::Object(map);
        assert!(project(&document, None).strict_eq(&document));
    }
}
