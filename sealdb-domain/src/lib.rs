// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SealDB Domain
//!
//! Pure business logic for SealDB: entities, value objects, aggregates, and
//! domain services, with no I/O and no dependency on a specific crypto or
//! storage backend. Infrastructure (concrete `CryptoService`/
//! `FileCodecService` adapters, the save queue, the public engine facade)
//! lives in the `sealdb` crate and depends on this one, never the other
//! way around.
//!
//! ## Layout
//!
//! - [`value_objects`] — `Value`, `FieldPath`, `DocumentId`, `Schema`,
//!   the query/update AST, index keys, key material.
//! - [`entities`] — `Document`, `Collection`, `Index`.
//! - [`aggregates`] — the `Database` aggregate and its `PendingMutation`
//!   atomicity pattern.
//! - [`events`] — the bounded operation log.
//! - [`services`] — the `CryptoService`/`FileCodecService` ports plus the
//!   pure schema validator and query evaluator.
//! - [`error`] — the `DbError` taxonomy.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregates::{Database, DatabaseHeader, IndexRequest};
pub use entities::{Collection, Document, Index};
pub use error::{DbError, DbResult};
pub use events::{OperationLog, OperationLogEntry};
pub use value_objects::{
    is_reserved_field, stringify_for_index, DefaultSpec, DocumentId, FieldDefinition, FieldKind, FieldOp,
    FieldPath, Filter, FindOptions, IndexKey, KeyMaterial, Salt, Schema, SortDirection, SortSpec, UpdateOp,
    UpdateSpec, Value, IV_LEN, KEY_LEN, MISSING_KEY, NULL_KEY, RESERVED_FIELDS, SALT_LEN,
};
