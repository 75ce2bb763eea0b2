// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod document_id;
pub mod field_path;
pub mod index_key;
pub mod key_material;
pub mod query;
pub mod schema;
pub mod update;
pub mod value;

pub use document_id::DocumentId;
pub use field_path::FieldPath;
pub use index_key::{stringify_for_index, IndexKey, MISSING_KEY, NULL_KEY};
pub use key_material::{KeyMaterial, Salt, IV_LEN, KEY_LEN, SALT_LEN};
pub use query::{FieldOp, Filter, FindOptions, SortDirection, SortSpec};
pub use schema::{is_reserved_field, DefaultSpec, FieldDefinition, FieldKind, Schema, RESERVED_FIELDS};
pub use update::{UpdateOp, UpdateSpec};
pub use value::Value;
