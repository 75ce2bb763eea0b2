// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A named collection of documents sharing one schema (§3).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::document::Document;
use crate::error::DbError;
use crate::value_objects::document_id::DocumentId;
use crate::value_objects::schema::Schema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    name: String,
    schema: Schema,
    documents: BTreeMap<DocumentId, Document>,
}

impl Collection {
    pub fn new(name: impl Into<String>, schema: Schema) -> Result<Self, DbError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DbError::collection("Collection name must not be empty"));
        }
        Ok(Self { name, schema, documents: BTreeMap::new() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn documents(&self) -> &BTreeMap<DocumentId, Document> {
        &self.documents
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn insert_document(&mut self, id: DocumentId, document: Document) {
        self.documents.insert(id, document);
    }

    pub fn remove_document(&mut self, id: &DocumentId) -> Option<Document> {
        self.documents.remove(id)
    }

    pub fn replace_document(&mut self, id: &DocumentId, document: Document) -> Result<Document, DbError> {
        match self.documents.insert(id.clone(), document) {
            Some(previous) => Ok(previous),
            None => Err(DbError::document(format!("Document {id} does not exist"))),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &Document)> {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(Collection::new("", Schema::empty()).is_err());
    }

    #[test]
    fn replace_document_fails_for_unknown_id() {
        let mut collection = Collection::new("users", Schema::empty()).unwrap();
        let result = collection.replace_document(&DocumentId::from("missing"), Document::new(BTreeMap::new()));
        assert!(result.is_err());
    }
}
