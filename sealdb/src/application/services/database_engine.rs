// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Database Engine
//!
//! The public application-service facade (C5): the single entry point a host
//! process embeds. It owns the in-memory `Database` aggregate plus the key
//! material derived at `open`, and coordinates the domain aggregate, the
//! pure schema/query services, and the two I/O ports (`CryptoService`,
//! `FileCodecService`) behind the save queue (§4.5, §5).
//!
//! Every mutating call follows the same shape: validate and build the change
//! entirely in memory, call into `Database` (which itself is all-or-nothing,
//! §9), persist through the save queue, and only then return — a failure at
//! any step before the save leaves the in-memory state exactly as it was.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use sealdb_domain::aggregates::database::IndexRequest;
use sealdb_domain::entities::document::{Document, FIELD_ID};
use sealdb_domain::error::DbError;
use sealdb_domain::services::crypto_service::CryptoService;
use sealdb_domain::services::file_codec_service::FileCodecService;
use sealdb_domain::services::{query_evaluator, schema_validator};
use sealdb_domain::value_objects::document_id::DocumentId;
use sealdb_domain::value_objects::field_path::FieldPath;
use sealdb_domain::value_objects::key_material::{KeyMaterial, Salt};
use sealdb_domain::value_objects::query::{Filter, FindOptions};
use sealdb_domain::value_objects::schema::Schema;
use sealdb_domain::value_objects::update::UpdateSpec;
use sealdb_domain::value_objects::value::Value;
use sealdb_domain::Database;

use crate::infrastructure::repositories::SaveQueue;

/// Result of a successful `update` call (§6: library surface result types).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: usize,
    pub modified_count: usize,
}

/// Result of a successful `delete` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: usize,
}

/// Snapshot returned by `get_stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub document_count: usize,
    pub index_count: usize,
    pub schema: Schema,
}

/// The portable export/import tree (§6 "Export tree (JSON)").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTree {
    pub version: u32,
    pub created: DateTime<Utc>,
    pub collections: BTreeMap<String, ExportCollection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportCollection {
    pub schema: Schema,
    pub documents: Vec<Value>,
}

const EXPORT_VERSION: u32 = 1;

struct EngineState {
    database: Database,
    key: KeyMaterial,
    salt: Salt,
}

/// The embeddable SealDB engine. Cheap to clone: everything it owns is
/// already behind an `Arc` or a lock, so a clone shares the same underlying
/// database instance rather than duplicating it.
pub struct DatabaseEngine<C, F>
where
    C: CryptoService + 'static,
    F: FileCodecService + 'static,
{
    crypto: Arc<C>,
    codec: Arc<F>,
    path: PathBuf,
    save_queue: Arc<SaveQueue>,
    state: Arc<RwLock<EngineState>>,
}

// Hand-written rather than derived: `#[derive(Clone)]` would add a spurious
// `C: Clone, F: Clone` bound even though only `Arc<C>`/`Arc<F>` are cloned.
impl<C, F> Clone for DatabaseEngine<C, F>
where
    C: CryptoService + 'static,
    F: FileCodecService + 'static,
{
    fn clone(&self) -> Self {
        Self {
            crypto: Arc::clone(&self.crypto),
            codec: Arc::clone(&self.codec),
            path: self.path.clone(),
            save_queue: Arc::clone(&self.save_queue),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C, F> DatabaseEngine<C, F>
where
    C: CryptoService + 'static,
    F: FileCodecService + 'static,
{
    /// Opens (or, if absent, initializes) the container at `path` (§4.5
    /// `open`/`init`). Never logs `passphrase`.
    #[instrument(skip(crypto, codec, passphrase), fields(path = %path.as_ref().display()))]
    pub async fn open(crypto: Arc<C>, codec: Arc<F>, path: impl AsRef<Path>, passphrase: &str) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();
        let opened = codec.open(&path, passphrase).await?;
        info!(collections = opened.database.collections().len(), "database opened");
        Ok(Self {
            crypto,
            codec,
            path,
            save_queue: Arc::new(SaveQueue::new()),
            state: Arc::new(RwLock::new(EngineState { database: opened.database, key: opened.key, salt: opened.salt })),
        })
    }

    async fn save(&self, database: &Database, key: &KeyMaterial, salt: &Salt) -> Result<(), DbError> {
        let path = self.path.clone();
        let codec = Arc::clone(&self.codec);
        let database = database.clone();
        let key = key.clone();
        let salt = salt.clone();
        self.save_queue.run_exclusive(|| async move { codec.save(&path, &database, &key, &salt).await }).await
    }

    /// `create_collection(name, {schema?, indexes?})` (§4.5).
    #[instrument(skip(self, schema_definition))]
    pub async fn create_collection(
        &self,
        name: &str,
        schema_definition: &Value,
        indexes: Vec<IndexRequest>,
    ) -> Result<(), DbError> {
        let schema = Schema::parse(schema_definition)?;
        let mut guard = self.state.write().await;
        let now = Utc::now();
        guard.database.create_collection(name, schema, indexes, now)?;
        self.save(&guard.database, &guard.key, &guard.salt).await?;
        Ok(())
    }

    /// `drop_collection(name)` (§4.5).
    #[instrument(skip(self))]
    pub async fn drop_collection(&self, name: &str) -> Result<(), DbError> {
        let mut guard = self.state.write().await;
        let now = Utc::now();
        guard.database.drop_collection(name, now)?;
        self.save(&guard.database, &guard.key, &guard.salt).await?;
        Ok(())
    }

    /// Encrypts every field the schema flags `encrypted`, in place on an
    /// already-validated document value (§4.1 step "process encrypted
    /// fields for storage").
    async fn encrypt_document_fields(&self, document: &mut Value, schema: &Schema, key: &KeyMaterial) -> Result<(), DbError> {
        let Some(map) = document.as_object_mut() else {
            return Ok(());
        };
        let encrypted_fields: Vec<String> = schema.encrypted_fields().map(str::to_string).collect();
        for field in encrypted_fields {
            if let Some(value) = map.get(&field).cloned() {
                let encoded = self.crypto.encrypt_field(&value, key).await?;
                map.insert(field, Value::from(encoded));
            }
        }
        Ok(())
    }

    /// Inverse of [`Self::encrypt_document_fields`], producing the decrypted
    /// view the engine always returns to callers (§5: never leak the
    /// encrypted storage form).
    async fn decrypt_document_fields(&self, document: &Value, schema: &Schema, key: &KeyMaterial) -> Result<Value, DbError> {
        let mut decrypted = document.clone();
        let Some(map) = decrypted.as_object_mut() else {
            return Ok(decrypted);
        };
        let encrypted_fields: Vec<String> = schema.encrypted_fields().map(str::to_string).collect();
        for field in encrypted_fields {
            let encoded = match map.get(&field) {
                Some(Value::String(encoded)) => Some(encoded.clone()),
                _ => None,
            };
            if let Some(encoded) = encoded {
                let value = self.crypto.decrypt_field(&encoded, key).await?;
                map.insert(field, value);
            }
        }
        Ok(decrypted)
    }

    /// `insert(collection, document)` (§4.5): validates via C3, encrypts
    /// flagged fields, enforces unique constraints and reindexes inside the
    /// aggregate, saves, and returns the decrypted stored document.
    #[instrument(skip(self, input))]
    pub async fn insert(&self, collection: &str, input: &Value) -> Result<Value, DbError> {
        let mut guard = self.state.write().await;
        let now = Utc::now();
        let schema = guard.database.collection(collection)?.schema().clone();

        let validated = schema_validator::validate_document(input, &schema, now)?;
        let mut stored_value = validated.as_value();
        self.encrypt_document_fields(&mut stored_value, &schema, &guard.key).await?;
        let stored_document = Document::from_value(stored_value)?;

        guard.database.insert_document(collection, stored_document, now)?;
        self.save(&guard.database, &guard.key, &guard.salt).await?;

        let stored = guard.database.collection(collection)?.get(&validated.id().expect("validated document has _id")).cloned();
        let stored = stored.ok_or_else(|| DbError::document("Inserted document vanished before read-back"))?;
        self.decrypt_document_fields(&stored.as_value(), &schema, &guard.key).await
    }

    /// Builds the decrypted, matching, sorted-and-paginated result set for
    /// a find over `collection` (§4.4 `find` execution steps).
    async fn find_matches(&self, collection: &str, filter: &Filter, options: &FindOptions, guard: &EngineState) -> Result<Vec<(DocumentId, Value)>, DbError> {
        let col = guard.database.collection(collection)?;
        let schema = col.schema();
        let mut decrypted: Vec<(DocumentId, Value)> = Vec::with_capacity(col.len());
        for (id, document) in col.iter() {
            let plain = self.decrypt_document_fields(&document.as_value(), schema, &guard.key).await?;
            decrypted.push((id.clone(), plain));
        }
        let mut matched: Vec<(DocumentId, Value)> = decrypted.into_iter().filter(|(_, v)| query_evaluator::matches(v, filter)).collect();
        query_evaluator::sort_documents(&mut matched, &options.sort, |(_, v)| v);
        let paginated = query_evaluator::paginate(matched, options);
        let projection = options.projection.as_deref();
        Ok(paginated.into_iter().map(|(id, v)| (id, query_evaluator::project(&v, projection))).collect())
    }

    /// `find(collection, query, options)` (§4.4).
    #[instrument(skip(self, query))]
    pub async fn find(&self, collection: &str, query: &Value, options: &FindOptions) -> Result<Vec<Value>, DbError> {
        let filter = Filter::parse(query)?;
        let guard = self.state.read().await;
        let matched = self.find_matches(collection, &filter, options, &guard).await?;
        Ok(matched.into_iter().map(|(_, v)| v).collect())
    }

    /// `find_one(collection, query)` (§4.4).
    #[instrument(skip(self, query))]
    pub async fn find_one(&self, collection: &str, query: &Value) -> Result<Option<Value>, DbError> {
        let filter = Filter::parse(query)?;
        let guard = self.state.read().await;
        let matched = self.find_matches(collection, &filter, &FindOptions::limited(1), &guard).await?;
        Ok(matched.into_iter().next().map(|(_, v)| v))
    }

    /// `update(collection, query, update)` (§4.5/§4.4) with `multi=true`:
    /// every matching document is replaced. See [`Self::update_one`] for the
    /// `multi=false` form.
    #[instrument(skip(self, query, update))]
    pub async fn update(&self, collection: &str, query: &Value, update: &Value) -> Result<UpdateOutcome, DbError> {
        self.update_impl(collection, query, update, true).await
    }

    /// `update(collection, query, update, {multi: false})` (§4.4 update
    /// execution): caps the replacement to at most one match, the first
    /// returned by the find evaluator's order.
    #[instrument(skip(self, query, update))]
    pub async fn update_one(&self, collection: &str, query: &Value, update: &Value) -> Result<UpdateOutcome, DbError> {
        self.update_impl(collection, query, update, false).await
    }

    async fn update_impl(&self, collection: &str, query: &Value, update: &Value, multi: bool) -> Result<UpdateOutcome, DbError> {
        let filter = Filter::parse(query)?;
        let spec = UpdateSpec::parse(update)?;

        let mut guard = self.state.write().await;
        let now = Utc::now();
        let schema = guard.database.collection(collection)?.schema().clone();

        let mut matches: Vec<(DocumentId, Value)> = self.find_matches(collection, &filter, &FindOptions::default(), &guard).await?;
        if !multi {
            matches.truncate(1);
        }
        let matched_count = matches.len();
        let mut modified_count = 0usize;

        for (id, mut decrypted) in matches {
            spec.apply(&mut decrypted)?;
            let revalidated = schema_validator::validate_document(&decrypted, &schema, now)?;
            let mut stored_value = revalidated.as_value();
            // Keep the original _id: re-validation assigns a fresh one when
            // absent, but an update always targets an existing document.
            stored_value.as_object_mut().expect("documents are objects").insert(FIELD_ID.to_string(), Value::from(id.as_str().to_string()));
            self.encrypt_document_fields(&mut stored_value, &schema, &guard.key).await?;
            let stored_document = Document::from_value(stored_value)?;
            guard.database.replace_document(collection, &id, stored_document, now)?;
            modified_count += 1;
        }

        if modified_count > 0 {
            self.save(&guard.database, &guard.key, &guard.salt).await?;
        }

        Ok(UpdateOutcome { matched_count, modified_count })
    }

    /// `delete(collection, query)` (§4.5/§4.4).
    #[instrument(skip(self, query))]
    pub async fn delete(&self, collection: &str, query: &Value) -> Result<DeleteOutcome, DbError> {
        let filter = Filter::parse(query)?;
        let mut guard = self.state.write().await;
        let now = Utc::now();

        let matches: Vec<(DocumentId, Value)> = self.find_matches(collection, &filter, &FindOptions::default(), &guard).await?;
        let deleted_count = matches.len();
        for (id, _) in &matches {
            guard.database.remove_document(collection, id, now)?;
        }

        if deleted_count > 0 {
            self.save(&guard.database, &guard.key, &guard.salt).await?;
        }

        Ok(DeleteOutcome { deleted_count })
    }

    /// `create_index(collection, field, {unique?, sparse?})` (§4.5).
    #[instrument(skip(self))]
    pub async fn create_index(&self, collection: &str, field: &str, unique: bool, sparse: bool) -> Result<(), DbError> {
        let path = FieldPath::parse(field)?;
        let mut guard = self.state.write().await;
        let now = Utc::now();
        guard.database.create_index(collection, path, unique, sparse, now)?;
        self.save(&guard.database, &guard.key, &guard.salt).await?;
        Ok(())
    }

    /// `drop_index(collection, field)` (§4.5).
    #[instrument(skip(self))]
    pub async fn drop_index(&self, collection: &str, field: &str) -> Result<(), DbError> {
        let path = FieldPath::parse(field)?;
        let mut guard = self.state.write().await;
        let now = Utc::now();
        guard.database.drop_index(collection, &path, now)?;
        self.save(&guard.database, &guard.key, &guard.salt).await?;
        Ok(())
    }

    /// `get_stats(collection)` (§4.5): document count, index count, schema
    /// snapshot.
    pub async fn get_stats(&self, collection: &str) -> Result<CollectionStats, DbError> {
        let guard = self.state.read().await;
        let col = guard.database.collection(collection)?;
        let index_count = guard.database.indexes().keys().filter(|key| key.belongs_to_collection(collection)).count();
        Ok(CollectionStats { document_count: col.len(), index_count, schema: col.schema().clone() })
    }

    /// `export()` (§6): the portable tree with every field decrypted.
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<ExportTree, DbError> {
        let guard = self.state.read().await;
        let mut collections = BTreeMap::new();
        for (name, collection) in guard.database.collections() {
            let schema = collection.schema().clone();
            let mut documents = Vec::with_capacity(collection.len());
            for (_, document) in collection.iter() {
                documents.push(self.decrypt_document_fields(&document.as_value(), &schema, &guard.key).await?);
            }
            collections.insert(name.clone(), ExportCollection { schema, documents });
        }
        Ok(ExportTree { version: EXPORT_VERSION, created: guard.database.header.created, collections })
    }

    /// `import(tree)` (§4.5): creates missing collections from the supplied
    /// schema, then inserts each document through the normal insert path.
    #[instrument(skip(self, tree))]
    pub async fn import(&self, tree: &ExportTree) -> Result<(), DbError> {
        for (name, collection) in &tree.collections {
            let exists = {
                let guard = self.state.read().await;
                guard.database.collection(name).is_ok()
            };
            if !exists {
                let schema_value = serde_json::to_value(&collection.schema)?;
                self.create_collection(name, &Value::from_json(schema_value), vec![]).await?;
            }
            for document in &collection.documents {
                self.insert(name, document).await?;
            }
        }
        Ok(())
    }

    /// `backup(dest)`: delegates to C2's whole-file copy (§4.2 `backup()`).
    #[instrument(skip(self))]
    pub async fn backup(&self, dest: impl AsRef<Path>) -> Result<(), DbError> {
        self.codec.backup(&self.path, dest.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{Aes256CbcCrypto, VdbFileCodec};
    use std::collections::BTreeMap as Map;

    type TestEngine = DatabaseEngine<Aes256CbcCrypto, VdbFileCodec<Aes256CbcCrypto>>;

    async fn open_engine(path: &Path) -> TestEngine {
        let crypto = Arc::new(Aes256CbcCrypto::new());
        let codec = Arc::new(VdbFileCodec::new(Aes256CbcCrypto::new()));
        DatabaseEngine::open(crypto, codec, path, "correct horse battery staple").await.unwrap()
    }

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<Map<_, _>>())
    }

    fn users_schema() -> Value {
        let mut email = Map::new();
        email.insert("type".to_string(), Value::from("string"));
        email.insert("required".to_string(), Value::from(true));
        email.insert("unique".to_string(), Value::from(true));
        let mut age = Map::new();
        age.insert("type".to_string(), Value::from("number"));
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::Object(email));
        fields.insert("age".to_string(), Value::Object(age));
        Value::Object(fields)
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let engine = open_engine(&path).await;

        engine.create_collection("users", &users_schema(), vec![]).await.unwrap();
        let input = obj(vec![("email", Value::from("a@x.com")), ("age", Value::from(30i64))]);
        let stored = engine.insert("users", &input).await.unwrap();
        assert!(stored.get_path("_id").is_some());

        let found = engine.find_one("users", &obj(vec![("email", Value::from("a@x.com"))])).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn duplicate_unique_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let engine = open_engine(&path).await;

        engine.create_collection("users", &users_schema(), vec![]).await.unwrap();
        let first = obj(vec![("email", Value::from("dup@x.com")), ("age", Value::from(1i64))]);
        engine.insert("users", &first).await.unwrap();
        let second = obj(vec![("email", Value::from("dup@x.com")), ("age", Value::from(2i64))]);
        assert!(engine.insert("users", &second).await.is_err());
    }

    #[tokio::test]
    async fn update_increments_a_field_and_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let engine = open_engine(&path).await;

        engine.create_collection("users", &users_schema(), vec![]).await.unwrap();
        engine.insert("users", &obj(vec![("email", Value::from("a@x.com")), ("age", Value::from(10i64))])).await.unwrap();

        let mut inc = Map::new();
        inc.insert("age".to_string(), Value::from(1i64));
        let mut update = Map::new();
        update.insert("$inc".to_string(), Value::Object(inc));

        let outcome = engine
            .update("users", &obj(vec![("email", Value::from("a@x.com"))]), &Value::Object(update))
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 1);

        let found = engine.find_one("users", &obj(vec![("email", Value::from("a@x.com"))])).await.unwrap().unwrap();
        assert_eq!(found.get_path("age").unwrap().as_f64(), Some(11.0));
    }

    #[tokio::test]
    async fn update_one_caps_the_replacement_to_a_single_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let engine = open_engine(&path).await;

        engine.create_collection("users", &users_schema(), vec![]).await.unwrap();
        engine.insert("users", &obj(vec![("email", Value::from("a@x.com")), ("age", Value::from(10i64))])).await.unwrap();
        engine.insert("users", &obj(vec![("email", Value::from("b@x.com")), ("age", Value::from(10i64))])).await.unwrap();

        let mut set = Map::new();
        set.insert("age".to_string(), Value::from(99i64));
        let mut update = Map::new();
        update.insert("$set".to_string(), Value::Object(set));

        let outcome = engine.update_one("users", &obj(vec![("age", Value::from(10i64))]), &Value::Object(update)).await.unwrap();
        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 1);

        let find_options = FindOptions { sort: vec![], skip: 0, limit: None, projection: None };
        let remaining = engine.find("users", &obj(vec![("age", Value::from(10i64))]), &find_options).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_matching_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let engine = open_engine(&path).await;

        engine.create_collection("users", &users_schema(), vec![]).await.unwrap();
        engine.insert("users", &obj(vec![("email", Value::from("a@x.com")), ("age", Value::from(1i64))])).await.unwrap();

        let outcome = engine.delete("users", &obj(vec![("email", Value::from("a@x.com"))])).await.unwrap();
        assert_eq!(outcome.deleted_count, 1);
        assert!(engine.find_one("users", &obj(vec![("email", Value::from("a@x.com"))])).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn encrypted_field_never_appears_on_disk_in_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let engine = open_engine(&path).await;

        let mut ssn = Map::new();
        ssn.insert("type".to_string(), Value::from("string"));
        ssn.insert("encrypted".to_string(), Value::from(true));
        let mut fields = Map::new();
        fields.insert("ssn".to_string(), Value::Object(ssn));
        engine.create_collection("people", &Value::Object(fields), vec![]).await.unwrap();

        engine.insert("people", &obj(vec![("ssn", Value::from("123-45-6789"))])).await.unwrap();

        let raw = tokio::fs::read(&path).await.unwrap();
        let as_text = String::from_utf8_lossy(&raw);
        assert!(!as_text.contains("123-45-6789"));

        let found = engine.find_one("people", &Value::Object(Map::new())).await.unwrap().unwrap();
        assert_eq!(found.get_path("ssn").unwrap().as_str(), Some("123-45-6789"));
    }

    #[tokio::test]
    async fn find_with_a_projection_returns_only_the_named_fields_and_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let engine = open_engine(&path).await;

        engine.create_collection("users", &users_schema(), vec![]).await.unwrap();
        engine.insert("users", &obj(vec![("email", Value::from("a@x.com")), ("age", Value::from(30i64))])).await.unwrap();

        let options = FindOptions { projection: Some(vec![FieldPath::parse("email").unwrap()]), ..Default::default() };
        let found = engine.find("users", &obj(vec![]), &options).await.unwrap();
        assert_eq!(found.len(), 1);
        let doc = &found[0];
        assert_eq!(doc.get_path("email").unwrap().as_str(), Some("a@x.com"));
        assert!(doc.get_path("_id").is_some());
        assert!(doc.get_path("age").is_none());
    }

    #[tokio::test]
    async fn export_then_import_round_trips_into_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.vdb");
        let engine_a = open_engine(&path_a).await;
        engine_a.create_collection("users", &users_schema(), vec![]).await.unwrap();
        engine_a.insert("users", &obj(vec![("email", Value::from("a@x.com")), ("age", Value::from(5i64))])).await.unwrap();
        let tree = engine_a.export().await.unwrap();
        assert_eq!(tree.collections.len(), 1);

        let path_b = dir.path().join("b.vdb");
        let engine_b = open_engine(&path_b).await;
        engine_b.import(&tree).await.unwrap();
        let found = engine_b.find_one("users", &obj(vec![("email", Value::from("a@x.com"))])).await.unwrap();
        assert!(found.is_some());
    }
}
