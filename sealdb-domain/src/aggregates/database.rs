// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `Database` aggregate (C5): collections, documents, secondary
//! indexes, unique constraints, and the bounded operation log, all as pure
//! in-memory state. I/O (file codec, crypto) and schema/query parsing live
//! one layer up; this aggregate only enforces §3's five invariants and the
//! cross-structure atomicity pattern of §9.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregates::pending_mutation::{DocumentChange, PendingMutation};
use crate::entities::collection::Collection;
use crate::entities::document::Document;
use crate::entities::index::Index;
use crate::error::DbError;
use crate::events::operation_log::{OperationLog, OperationLogEntry};
use crate::value_objects::document_id::DocumentId;
use crate::value_objects::field_path::FieldPath;
use crate::value_objects::index_key::IndexKey;
use crate::value_objects::schema::Schema;
use crate::value_objects::value::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHeader {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// A requested secondary index, either declared by a schema field's
/// `index: true` flag or via an explicit `create_index` call.
#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub field: FieldPath,
    pub unique: bool,
    pub sparse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub header: DatabaseHeader,
    collections: BTreeMap<String, Collection>,
    indexes: BTreeMap<IndexKey, Index>,
    operation_log: OperationLog,
}

impl Database {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            header: DatabaseHeader { created: now, modified: now },
            collections: BTreeMap::new(),
            indexes: BTreeMap::new(),
            operation_log: OperationLog::default(),
        }
    }

    pub fn collections(&self) -> &BTreeMap<String, Collection> {
        &self.collections
    }

    pub fn collection(&self, name: &str) -> Result<&Collection, DbError> {
        self.collections.get(name).ok_or_else(|| DbError::collection(format!("Collection '{name}' does not exist")))
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection, DbError> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| DbError::collection(format!("Collection '{name}' does not exist")))
    }

    pub fn indexes(&self) -> &BTreeMap<IndexKey, Index> {
        &self.indexes
    }

    fn indexes_for_collection_mut(&mut self, collection: &str) -> impl Iterator<Item = &mut Index> {
        self.indexes.iter_mut().filter(move |(key, _)| key.belongs_to_collection(collection)).map(|(_, idx)| idx)
    }

    pub fn operation_log(&self) -> &OperationLog {
        &self.operation_log
    }

    fn record(&mut self, operation: &str, details: impl Into<String>, now: DateTime<Utc>) {
        self.operation_log.push(OperationLogEntry::new(operation, details, now));
        self.header.modified = now;
    }

    /// `create_collection` (§4.5): name must be non-empty and distinct;
    /// schema defaults and `index: true` fields become eager secondary
    /// indexes alongside any explicitly requested ones.
    pub fn create_collection(
        &mut self,
        name: &str,
        schema: Schema,
        extra_indexes: Vec<IndexRequest>,
        now: DateTime<Utc>,
    ) -> Result<(), DbError> {
        if self.collections.contains_key(name) {
            return Err(DbError::collection(format!("Collection '{name}' already exists")));
        }
        let mut requests: Vec<IndexRequest> = schema
            .indexed_fields()
            .map(|f| IndexRequest { field: FieldPath::parse(f).expect("schema field names are valid paths"), unique: false, sparse: false })
            .collect();
        for field in schema.unique_fields() {
            let path = FieldPath::parse(field).expect("schema field names are valid paths");
            if let Some(existing) = requests.iter_mut().find(|r| r.field == path) {
                existing.unique = true;
            } else {
                requests.push(IndexRequest { field: path, unique: true, sparse: true });
            }
        }
        requests.extend(extra_indexes);

        let collection = Collection::new(name, schema)?;
        self.collections.insert(name.to_string(), collection);

        for request in requests {
            let key = IndexKey::new(name, request.field.clone());
            self.indexes.insert(key, Index::new(request.field, request.unique, request.sparse));
        }

        self.record("create_collection", format!("collection={name}"), now);
        Ok(())
    }

    /// `drop_collection` (§3 lifecycle): removes the collection and every
    /// index whose key prefix matches.
    pub fn drop_collection(&mut self, name: &str, now: DateTime<Utc>) -> Result<(), DbError> {
        if self.collections.remove(name).is_none() {
            return Err(DbError::collection(format!("Collection '{name}' does not exist")));
        }
        self.indexes.retain(|key, _| !key.belongs_to_collection(name));
        self.record("drop_collection", format!("collection={name}"), now);
        Ok(())
    }

    /// `create_index` (§4.5): builds the index from current documents;
    /// fails if one already exists at this key, or if `unique` would be
    /// violated by existing data.
    pub fn create_index(
        &mut self,
        collection: &str,
        field: FieldPath,
        unique: bool,
        sparse: bool,
        now: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let key = IndexKey::new(collection, field.clone());
        if self.indexes.contains_key(&key) {
            return Err(DbError::index(format!("Index '{key}' already exists")));
        }
        let docs: Vec<(DocumentId, Value)> = self
            .collection(collection)?
            .iter()
            .map(|(id, doc)| (id.clone(), doc.as_value()))
            .collect();
        let index = Index::rebuild(field, unique, sparse, &docs)?;
        self.indexes.insert(key.clone(), index);
        self.record("create_index", format!("index={key}"), now);
        Ok(())
    }

    pub fn drop_index(&mut self, collection: &str, field: &FieldPath, now: DateTime<Utc>) -> Result<(), DbError> {
        let key = IndexKey::new(collection, field.clone());
        if self.indexes.remove(&key).is_none() {
            return Err(DbError::index(format!("Index '{key}' does not exist")));
        }
        self.record("drop_index", format!("index={key}"), now);
        Ok(())
    }

    /// Checks every unique index on `collection` for a collision, then
    /// inserts `document` and keeps all of that collection's indexes
    /// coherent — all-or-nothing (§9 `PendingMutation` pattern).
    pub fn insert_document(&mut self, collection: &str, document: Document, now: DateTime<Utc>) -> Result<DocumentId, DbError> {
        let id = document.id().ok_or_else(|| DbError::document("Document is missing an assigned _id"))?;
        self.collection(collection)?; // existence check
        let snapshot = document.as_value();

        for (key, index) in &self.indexes {
            if key.belongs_to_collection(collection) && index.would_collide(&snapshot, None) {
                return Err(DbError::unique_constraint(index.field.as_str(), snapshot.stringify()));
            }
        }

        let pending = PendingMutation::insert(collection, id.clone(), document);
        self.apply(pending, now)?;
        Ok(id)
    }

    /// Replaces the stored document for `id`, re-checking uniqueness
    /// excluding the document's own prior value, and reindexing every
    /// affected index.
    pub fn replace_document(&mut self, collection: &str, id: &DocumentId, updated: Document, now: DateTime<Utc>) -> Result<Document, DbError> {
        let previous = self.collection(collection)?.get(id).cloned().ok_or_else(|| DbError::document(format!("Document {id} does not exist")))?;
        let new_snapshot = updated.as_value();

        for (key, index) in &self.indexes {
            if key.belongs_to_collection(collection) && index.would_collide(&new_snapshot, Some(id)) {
                return Err(DbError::unique_constraint(index.field.as_str(), new_snapshot.stringify()));
            }
        }

        let pending = PendingMutation::replace(collection, id.clone(), previous.clone(), updated);
        self.apply(pending, now)?;
        Ok(previous)
    }

    pub fn remove_document(&mut self, collection: &str, id: &DocumentId, now: DateTime<Utc>) -> Result<Document, DbError> {
        let previous = self.collection(collection)?.get(id).cloned().ok_or_else(|| DbError::document(format!("Document {id} does not exist")))?;
        let pending = PendingMutation::remove(collection, id.clone(), previous.clone());
        self.apply(pending, now)?;
        Ok(previous)
    }

    /// Applies a pre-validated mutation in one pass: document storage
    /// first, then every index on the collection. Nothing here can fail —
    /// all fallible checks already happened while building `pending`.
    fn apply(&mut self, pending: PendingMutation, now: DateTime<Utc>) -> Result<(), DbError> {
        let PendingMutation { collection, change } = pending;
        let operation = match &change {
            DocumentChange::Insert { .. } => "insert",
            DocumentChange::Replace { .. } => "update",
            DocumentChange::Remove { .. } => "delete",
        };
        let detail_id = match &change {
            DocumentChange::Insert { id, .. } | DocumentChange::Replace { id, .. } | DocumentChange::Remove { id, .. } => id.clone(),
        };

        match change {
            DocumentChange::Insert { id, document } => {
                let snapshot = document.as_value();
                self.collection_mut(&collection)?.insert_document(id.clone(), document);
                for index in self.indexes_for_collection_mut(&collection) {
                    index.insert(&snapshot, &id)?;
                }
            }
            DocumentChange::Replace { id, previous, updated } => {
                let old_snapshot = previous.as_value();
                let new_snapshot = updated.as_value();
                self.collection_mut(&collection)?.replace_document(&id, updated)?;
                for index in self.indexes_for_collection_mut(&collection) {
                    index.reindex(&old_snapshot, &new_snapshot, &id)?;
                }
            }
            DocumentChange::Remove { id, previous } => {
                let snapshot = previous.as_value();
                self.collection_mut(&collection)?.remove_document(&id);
                for index in self.indexes_for_collection_mut(&collection) {
                    index.remove(&snapshot, &id);
                }
            }
        }

        self.record(operation, format!("collection={collection} id={detail_id}"), now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::schema_validator::validate_document;
    use crate::value_objects::schema::FieldDefinition;
    use crate::value_objects::schema::FieldKind;
    use std::collections::BTreeMap as Map;

    fn users_schema() -> Schema {
        let mut fields = Map::new();
        fields.insert(
            "email".to_string(),
            FieldDefinition::new(FieldKind::String).with_required(true).with_unique(true),
        );
        fields.insert("age".to_string(), FieldDefinition::new(FieldKind::Number).with_bounds(Some(0.0), None));
        Schema::new(fields)
    }

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn insert_find_and_unique_violation() {
        let now = Utc::now();
        let mut db = Database::new(now);
        db.create_collection("users", users_schema(), vec![], now).unwrap();

        let input = obj(vec![("email", Value::from("a@x")), ("age", Value::from(30i64))]);
        let doc = validate_document(&input, db.collection("users").unwrap().schema(), now).unwrap();
        let id = db.insert_document("users", doc, now).unwrap();
        assert_eq!(db.collection("users").unwrap().len(), 1);

        let dup_input = obj(vec![("email", Value::from("a@x")), ("age", Value::from(40i64))]);
        let dup_doc = validate_document(&dup_input, db.collection("users").unwrap().schema(), now).unwrap();
        let result = db.insert_document("users", dup_doc, now);
        assert!(result.is_err());
        assert_eq!(db.collection("users").unwrap().len(), 1);
        assert_eq!(db.collection("users").unwrap().get(&id).unwrap().get("age").unwrap().as_f64(), Some(30.0));
    }

    #[test]
    fn update_keeps_index_coherent() {
        let now = Utc::now();
        let mut db = Database::new(now);
        let mut fields = Map::new();
        fields.insert("name".to_string(), FieldDefinition::new(FieldKind::String));
        let schema = Schema::new(fields);
        db.create_collection("u", schema, vec![IndexRequest { field: FieldPath::parse("name").unwrap(), unique: false, sparse: false }], now)
            .unwrap();

        let input = obj(vec![("name", Value::from("x"))]);
        let doc = validate_document(&input, db.collection("u").unwrap().schema(), now).unwrap();
        let id = db.insert_document("u", doc, now).unwrap();

        let mut updated = db.collection("u").unwrap().get(&id).unwrap().clone();
        updated.fields_mut().insert("name".to_string(), Value::from("y"));
        db.replace_document("u", &id, updated, now).unwrap();

        let index_key = IndexKey::new("u", FieldPath::parse("name").unwrap());
        let index = db.indexes().get(&index_key).unwrap();
        assert!(index.ids_for_key("x").is_none());
        assert!(index.ids_for_key("y").unwrap().contains(&id));
    }

    #[test]
    fn drop_collection_removes_its_indexes() {
        let now = Utc::now();
        let mut db = Database::new(now);
        db.create_collection("users", users_schema(), vec![], now).unwrap();
        assert!(!db.indexes().is_empty());
        db.drop_collection("users", now).unwrap();
        assert!(db.indexes().is_empty());
        assert!(db.collection("users").is_err());
    }
}
