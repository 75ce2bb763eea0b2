// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SealDB
//!
//! An embedded, single-encrypted-file document database. The entire
//! database — collections, documents, schemas, secondary indexes, and the
//! bounded operation log — lives inside one `VDB1` container on disk,
//! encrypted at rest with a passphrase-derived key.
//!
//! ## Layout
//!
//! - [`application::services::DatabaseEngine`] — the public facade: open,
//!   create/drop collections and indexes, insert, find, update, delete,
//!   export/import, backup.
//! - [`infrastructure::adapters`] — the `CryptoService` and `FileCodecService`
//!   port implementations (`Aes256CbcCrypto`, `VdbFileCodec`).
//! - [`infrastructure::repositories::SaveQueue`] — the single-writer save
//!   queue guarding every call into the file codec.
//! - [`config::DatabaseConfig`] — tunable, non-secret engine parameters.
//!
//! Pure domain logic (the `Database` aggregate, schema validator, query and
//! update evaluators) lives one layer down in the `sealdb-domain` crate,
//! re-exported here where callers need it directly.

pub mod application;
pub mod config;
pub mod infrastructure;

pub use application::services::{CollectionStats, DatabaseEngine, DeleteOutcome, ExportCollection, ExportTree, UpdateOutcome};
pub use config::DatabaseConfig;
pub use infrastructure::adapters::{Aes256CbcCrypto, VdbFileCodec};
pub use infrastructure::repositories::SaveQueue;

pub use sealdb_domain::error::{DbError, DbResult};
pub use sealdb_domain::value_objects::query::{FindOptions, SortDirection, SortSpec};
pub use sealdb_domain::value_objects::schema::Schema;
pub use sealdb_domain::value_objects::value::Value;
pub use sealdb_domain::Database;
