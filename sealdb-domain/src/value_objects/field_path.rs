// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Dotted field-path value object used by schemas, indexes, query filters,
//! and update operators to name a (possibly nested) document field.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DbError;

/// A validated dotted path like `address.city` or `tags`.
///
/// Construction rejects empty segments (`a..b`, leading/trailing dots) so
/// every other layer can assume a `FieldPath` is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DbError> {
        let raw = raw.into();
        if raw.is_empty() || raw.split('.').any(|segment| segment.is_empty()) {
            return Err(DbError::validation(format!("Invalid field path: '{raw}'")));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    pub fn top_level(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    pub fn is_nested(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = DbError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        FieldPath::parse(value)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = DbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldPath::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_and_nested_paths() {
        let simple = FieldPath::parse("name").unwrap();
        assert!(!simple.is_nested());
        assert_eq!(simple.top_level(), "name");

        let nested = FieldPath::parse("address.city").unwrap();
        assert!(nested.is_nested());
        assert_eq!(nested.top_level(), "address");
        assert_eq!(nested.segments().collect::<Vec<_>>(), vec!["address", "city"]);
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse(".a").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("a.").is_err());
    }
}
