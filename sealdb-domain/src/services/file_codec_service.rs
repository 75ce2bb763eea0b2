// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! File codec port (C2): open/save/backup the single-file container.
//!
//! The concrete VDB1 container layout (§4.2) — magic bytes, salt, digest,
//! IV, ciphertext, all the byte-offset bookkeeping — is an infrastructure
//! concern implemented against this trait. The domain only needs to know
//! that opening yields a rehydrated `Database` plus the key material
//! derived from the passphrase, and that saving persists one back out.

use async_trait::async_trait;
use std::path::Path;

use crate::aggregates::database::Database;
use crate::error::DbError;
use crate::value_objects::key_material::{KeyMaterial, Salt};

/// The result of opening a container file: the rehydrated aggregate plus
/// the key material and salt needed to save it again.
pub struct OpenedDatabase {
    pub database: Database,
    pub key: KeyMaterial,
    pub salt: Salt,
}

#[async_trait]
pub trait FileCodecService: Send + Sync {
    /// Opens `path` with `passphrase`. If the file does not exist, creates
    /// a fresh salt, derives a key, and performs an initial save before
    /// returning (§4.2 "If the file does not exist at open time...").
    async fn open(&self, path: &Path, passphrase: &str) -> Result<OpenedDatabase, DbError>;

    /// Serializes `database`, compresses, encrypts with `key`, computes the
    /// digest, and atomically writes the container to `path` via a
    /// temp-file-then-rename sequence (§4.2 Save steps 1-9).
    async fn save(&self, path: &Path, database: &Database, key: &KeyMaterial, salt: &Salt) -> Result<(), DbError>;

    /// A whole-file byte copy of `path` to `dest`, not a re-serialization.
    async fn backup(&self, path: &Path, dest: &Path) -> Result<(), DbError>;
}
