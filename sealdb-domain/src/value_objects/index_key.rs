// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Index identity and the reserved stringified-value keys used for
//! null/missing field values (§3: "Null and missing are mapped to distinct
//! reserved key strings.").

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::field_path::FieldPath;
use crate::value_objects::value::Value;

/// Identifies an index by `(collection, field)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexKey {
    pub collection: String,
    pub field: FieldPath,
}

impl IndexKey {
    pub fn new(collection: impl Into<String>, field: FieldPath) -> Self {
        Self { collection: collection.into(), field }
    }

    /// The persisted key string: `<collection>.<field>`, also used to
    /// recognize "every index whose key prefix matches" a dropped
    /// collection (§3 lifecycle).
    pub fn storage_key(&self) -> String {
        format!("{}.{}", self.collection, self.field)
    }

    pub fn belongs_to_collection(&self, collection: &str) -> bool {
        self.collection == collection
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

/// Reserved stringified keys for values that are absent entirely versus
/// present but JSON `null` — kept distinct so a sparse unique index can
/// tell "field omitted" from "field explicitly nulled".
pub const MISSING_KEY: &str = "\u{0}__missing__";
pub const NULL_KEY: &str = "\u{0}__null__";

/// Stringifies a field's resolved value for use as an index map key.
pub fn stringify_for_index(value: Option<&Value>) -> String {
    match value {
        None => MISSING_KEY.to_string(),
        Some(Value::Null) => NULL_KEY.to_string(),
        Some(v) => v.stringify(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_combines_collection_and_field() {
        let key = IndexKey::new("users", FieldPath::parse("email").unwrap());
        assert_eq!(key.storage_key(), "users.email");
        assert!(key.belongs_to_collection("users"));
    }

    #[test]
    fn missing_and_null_map_to_distinct_keys() {
        assert_ne!(stringify_for_index(None), stringify_for_index(Some(&Value::Null)));
        assert_eq!(stringify_for_index(Some(&Value::from("x"))), "x");
    }
}
