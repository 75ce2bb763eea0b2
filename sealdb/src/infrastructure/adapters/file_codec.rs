// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Infrastructure module - concrete implementation of a domain port.
//! # VDB1 Container Codec
//!
//! Concrete `FileCodecService` adapter implementing the on-disk container
//! layout exactly (§4.2):
//!
//! ```text
//! offset    bytes   meaning
//! 0         4       magic "VDB1"
//! 4         4       format version (u32 LE) = 1
//! 8         4       salt length S (u32 LE)
//! 12        S       salt bytes
//! 12+S      4       digest length (u32 LE), always 64
//! 16+S      64      SHA-256 of the ciphertext, as ASCII hex
//! 80+S      4       payload length P = 16 + ciphertext_len (u32 LE)
//! 84+S      16      initialization vector
//! 100+S     P-16    ciphertext
//! ```
//!
//! The ciphertext is `AES-256-CBC(key, iv, gzip(utf8(json_image)))`, where
//! `json_image` is the serialized `Database` aggregate. Saves are written to
//! a sibling `<path>.tmp` file and atomically renamed over the destination;
//! a failure at any step removes the temporary file and surfaces the error.

use async_trait::async_trait;
use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio::fs;

use sealdb_domain::aggregates::database::Database;
use sealdb_domain::error::DbError;
use sealdb_domain::services::crypto_service::{Ciphertext, CryptoService};
use sealdb_domain::services::file_codec_service::{FileCodecService, OpenedDatabase};
use sealdb_domain::value_objects::key_material::{KeyMaterial, Salt};

const MAGIC: &[u8; 4] = b"VDB1";
const FORMAT_VERSION: u32 = 1;
const DIGEST_LEN: usize = 64;
const IV_FIELD_LEN: usize = 16;
const DEFAULT_GZIP_LEVEL: u32 = 6;

/// Codec for the VDB1 single-file container, generic over the crypto
/// primitive so tests can swap in a fake without touching the byte layout.
pub struct VdbFileCodec<C: CryptoService> {
    crypto: C,
    gzip_level: u32,
}

impl<C: CryptoService> VdbFileCodec<C> {
    pub fn new(crypto: C) -> Self {
        Self { crypto, gzip_level: DEFAULT_GZIP_LEVEL }
    }

    pub fn with_gzip_level(crypto: C, gzip_level: u32) -> Self {
        Self { crypto, gzip_level }
    }

    fn build_container(salt: &Salt, digest_hex: &str, iv: &[u8], ciphertext: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(100 + salt.len() + ciphertext.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        buf.extend_from_slice(&(salt.len() as u32).to_le_bytes());
        buf.extend_from_slice(salt.as_bytes());
        buf.extend_from_slice(&(DIGEST_LEN as u32).to_le_bytes());
        buf.extend_from_slice(digest_hex.as_bytes());
        let payload_len = IV_FIELD_LEN + ciphertext.len();
        buf.extend_from_slice(&(payload_len as u32).to_le_bytes());
        buf.extend_from_slice(iv);
        buf.extend_from_slice(ciphertext);
        buf
    }

    /// Unpacks the container into its parts. Every length is validated
    /// against the remaining buffer before being trusted as a slice bound,
    /// so a truncated or hostile file fails with `FormatError` instead of
    /// panicking.
    fn parse_container(bytes: &[u8]) -> Result<(Salt, String, Vec<u8>, Vec<u8>), DbError> {
        if bytes.len() < 12 {
            return Err(DbError::format("Container is too short to contain a header"));
        }
        if &bytes[0..4] != MAGIC {
            return Err(DbError::format("Not a SealDB container: bad magic bytes"));
        }
        let version = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        if version != FORMAT_VERSION {
            return Err(DbError::format(format!("Unsupported format version {version}")));
        }

        let salt_len = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
        let salt_start = 12;
        let salt_end = salt_start
            .checked_add(salt_len)
            .ok_or_else(|| DbError::format("Salt length overflows container"))?;
        if bytes.len() < salt_end + 4 {
            return Err(DbError::format("Container truncated before digest length"));
        }
        let salt = Salt::new(bytes[salt_start..salt_end].to_vec());

        let digest_len_offset = salt_end;
        let digest_len = u32::from_le_bytes(bytes[digest_len_offset..digest_len_offset + 4].try_into().unwrap()) as usize;
        if digest_len != DIGEST_LEN {
            return Err(DbError::format(format!("Unexpected digest length {digest_len}, expected {DIGEST_LEN}")));
        }
        let digest_start = digest_len_offset + 4;
        let digest_end = digest_start + DIGEST_LEN;
        if bytes.len() < digest_end + 4 {
            return Err(DbError::format("Container truncated before payload length"));
        }
        let digest_hex = String::from_utf8(bytes[digest_start..digest_end].to_vec())
            .map_err(|_| DbError::format("Digest field is not valid ASCII"))?;

        let payload_len_offset = digest_end;
        let payload_len = u32::from_le_bytes(bytes[payload_len_offset..payload_len_offset + 4].try_into().unwrap()) as usize;
        if payload_len < IV_FIELD_LEN {
            return Err(DbError::format("Payload length too small to contain an initialization vector"));
        }
        let payload_start = payload_len_offset + 4;
        let payload_end = payload_start
            .checked_add(payload_len)
            .ok_or_else(|| DbError::format("Payload length overflows container"))?;
        if bytes.len() < payload_end {
            return Err(DbError::format("Container truncated before end of payload"));
        }

        let iv = bytes[payload_start..payload_start + IV_FIELD_LEN].to_vec();
        let ciphertext = bytes[payload_start + IV_FIELD_LEN..payload_end].to_vec();
        Ok((salt, digest_hex, iv, ciphertext))
    }

    async fn encode_image(&self, database: &Database, key: &KeyMaterial, salt: &Salt) -> Result<Vec<u8>, DbError> {
        let json = serde_json::to_vec(database)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.gzip_level));
        encoder.write_all(&json)?;
        let gzipped = encoder.finish()?;

        let ciphertext = self.crypto.encrypt(&gzipped, key).await?;
        let digest_hex = self.crypto.digest(&ciphertext.bytes).await;
        Ok(Self::build_container(salt, &digest_hex, &ciphertext.iv, &ciphertext.bytes))
    }

    async fn decode_image(&self, bytes: &[u8], passphrase: &str) -> Result<(Database, KeyMaterial, Salt), DbError> {
        let (salt, digest_hex, iv, ciphertext) = Self::parse_container(bytes)?;
        let (key, _) = self.crypto.derive_key(passphrase, Some(&salt)).await?;

        if !self.crypto.verify_digest(&ciphertext, &digest_hex).await {
            return Err(DbError::integrity("Stored digest does not match container ciphertext"));
        }

        let gzipped = self.crypto.decrypt(&Ciphertext { iv, bytes: ciphertext }, &key).await?;
        let mut json = Vec::new();
        GzDecoder::new(gzipped.as_slice()).read_to_end(&mut json)?;
        let database: Database = serde_json::from_slice(&json)?;
        Ok((database, key, salt))
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

#[async_trait]
impl<C: CryptoService> FileCodecService for VdbFileCodec<C> {
    async fn open(&self, path: &Path, passphrase: &str) -> Result<OpenedDatabase, DbError> {
        let exists = fs::try_exists(path).await.map_err(|e| DbError::storage(path.display().to_string(), e.to_string()))?;
        if !exists {
            let now = Utc::now();
            let database = Database::new(now);
            let (key, salt) = self.crypto.derive_key(passphrase, None).await?;
            self.save(path, &database, &key, &salt).await?;
            return Ok(OpenedDatabase { database, key, salt });
        }

        let bytes = fs::read(path).await.map_err(|e| DbError::storage(path.display().to_string(), e.to_string()))?;
        let (database, key, salt) = self.decode_image(&bytes, passphrase).await?;
        Ok(OpenedDatabase { database, key, salt })
    }

    async fn save(&self, path: &Path, database: &Database, key: &KeyMaterial, salt: &Salt) -> Result<(), DbError> {
        let mut snapshot = database.clone();
        snapshot.header.modified = Utc::now();
        let container = self.encode_image(&snapshot, key, salt).await?;

        let tmp_path = tmp_path_for(path);
        let result = Self::write_and_rename(&tmp_path, path, &container).await;
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }

    async fn backup(&self, path: &Path, dest: &Path) -> Result<(), DbError> {
        fs::copy(path, dest)
            .await
            .map(|_| ())
            .map_err(|e| DbError::storage(path.display().to_string(), format!("Backup to '{}' failed: {e}", dest.display())))
    }
}

impl<C: CryptoService> VdbFileCodec<C> {
    async fn write_and_rename(tmp_path: &Path, dest: &Path, container: &[u8]) -> Result<(), DbError> {
        fs::write(tmp_path, container).await.map_err(|e| DbError::storage(tmp_path.display().to_string(), e.to_string()))?;

        let metadata = fs::metadata(tmp_path).await.map_err(|e| DbError::storage(tmp_path.display().to_string(), e.to_string()))?;
        if metadata.len() == 0 {
            return Err(DbError::storage(tmp_path.display().to_string(), "Temporary save file is unexpectedly empty"));
        }

        fs::rename(tmp_path, dest).await.map_err(|e| DbError::storage(dest.display().to_string(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::crypto::Aes256CbcCrypto;
    use tempfile::tempdir;

    fn codec() -> VdbFileCodec<Aes256CbcCrypto> {
        VdbFileCodec::new(Aes256CbcCrypto::new())
    }

    #[tokio::test]
    async fn opening_a_missing_path_creates_an_empty_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let codec = codec();

        let opened = codec.open(&path, "passphrase").await.unwrap();
        assert!(opened.database.collections().is_empty());
        assert!(path.exists());

        let bytes = fs::read(&path).await.unwrap();
        assert_eq!(&bytes[0..4], MAGIC);
    }

    #[tokio::test]
    async fn save_then_open_round_trips_the_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let codec = codec();

        let first = codec.open(&path, "correct horse").await.unwrap();
        codec.save(&path, &first.database, &first.key, &first.salt).await.unwrap();

        let reopened = codec.open(&path, "correct horse").await.unwrap();
        assert_eq!(reopened.database.collections().len(), first.database.collections().len());
    }

    #[tokio::test]
    async fn wrong_passphrase_fails_with_integrity_or_crypto_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let codec = codec();
        codec.open(&path, "correct horse").await.unwrap();

        let bytes_before = fs::read(&path).await.unwrap();
        let result = codec.open(&path, "wrong passphrase").await;
        assert!(result.is_err());
        let bytes_after = fs::read(&path).await.unwrap();
        assert_eq!(bytes_before, bytes_after, "a failed open must not mutate the file");
    }

    #[tokio::test]
    async fn truncated_container_fails_with_format_error() {
        let codec = codec();
        let result = codec.open_from_bytes_for_test(b"not a container").await;
        assert!(matches!(result, Err(DbError::FormatError(_))));
    }

    #[tokio::test]
    async fn backup_copies_the_file_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.vdb");
        let dest = dir.path().join("db.bak");
        let codec = codec();
        codec.open(&path, "pw").await.unwrap();

        codec.backup(&path, &dest).await.unwrap();
        assert_eq!(fs::read(&path).await.unwrap(), fs::read(&dest).await.unwrap());
    }

    impl<C: CryptoService> VdbFileCodec<C> {
        async fn open_from_bytes_for_test(&self, bytes: &[u8]) -> Result<Database, DbError> {
            self.decode_image(bytes, "pw").await.map(|(db, _, _)| db)
        }
    }
}
