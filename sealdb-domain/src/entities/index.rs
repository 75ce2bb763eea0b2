// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Secondary index: a derived `(stringified-value) -> {document ids}`
//! mapping for one `(collection, field)` pair (§3).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::DbError;
use crate::value_objects::document_id::DocumentId;
use crate::value_objects::field_path::FieldPath;
use crate::value_objects::index_key::stringify_for_index;
use crate::value_objects::value::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub field: FieldPath,
    pub unique: bool,
    pub sparse: bool,
    entries: BTreeMap<String, BTreeSet<DocumentId>>,
}

impl Index {
    pub fn new(field: FieldPath, unique: bool, sparse: bool) -> Self {
        Self { field, unique, sparse, entries: BTreeMap::new() }
    }

    pub fn entries(&self) -> &BTreeMap<String, BTreeSet<DocumentId>> {
        &self.entries
    }

    pub fn ids_for_key(&self, key: &str) -> Option<&BTreeSet<DocumentId>> {
        self.entries.get(key)
    }

    /// Resolves a document's value for this index's field and inserts the
    /// (key, id) pair, enforcing `unique`/`sparse` per §3's index
    /// invariant. Sparse indexes simply skip documents where the field is
    /// undefined; unique indexes reject a key already mapped to a
    /// different id.
    pub fn insert(&mut self, document: &Value, id: &DocumentId) -> Result<(), DbError> {
        let field_value = document.get_path(self.field.as_str());
        if field_value.is_none() && self.sparse {
            return Ok(());
        }
        let key = stringify_for_index(field_value);
        if self.unique {
            if let Some(existing) = self.entries.get(&key) {
                if !existing.is_empty() && !existing.contains(id) {
                    return Err(DbError::unique_constraint(self.field.as_str(), key));
                }
            }
        }
        self.entries.entry(key).or_default().insert(id.clone());
        Ok(())
    }

    pub fn remove(&mut self, document: &Value, id: &DocumentId) {
        let key = stringify_for_index(document.get_path(self.field.as_str()));
        if let Some(ids) = self.entries.get_mut(&key) {
            ids.remove(id);
            if ids.is_empty() {
                self.entries.remove(&key);
            }
        }
    }

    /// Moves `id` from its old stringified key to the one implied by
    /// `new_document`, used after an update changes this index's field.
    pub fn reindex(&mut self, old_document: &Value, new_document: &Value, id: &DocumentId) -> Result<(), DbError> {
        self.remove(old_document, id);
        self.insert(new_document, id)
    }

    /// Would inserting `document` under this unique index collide with a
    /// document other than `exclude_id`? Used by the engine to re-check
    /// uniqueness excluding the document's own prior value (§4.4).
    pub fn would_collide(&self, document: &Value, exclude_id: Option<&DocumentId>) -> bool {
        if !self.unique {
            return false;
        }
        let field_value = document.get_path(self.field.as_str());
        if field_value.is_none() && self.sparse {
            return false;
        }
        let key = stringify_for_index(field_value);
        match self.entries.get(&key) {
            None => false,
            Some(ids) => ids.iter().any(|existing| Some(existing) != exclude_id),
        }
    }

    pub fn rebuild(field: FieldPath, unique: bool, sparse: bool, documents: &[(DocumentId, Value)]) -> Result<Self, DbError> {
        let mut index = Self::new(field, unique, sparse);
        for (id, doc) in documents {
            index.insert(doc, id)?;
        }
        Ok(index)
    }
}
