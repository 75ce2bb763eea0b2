// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Crypto primitives port (C1).
//!
//! `CryptoService` is the contract the file codec and field-level
//! encryption depend on; concrete implementations live in the
//! infrastructure layer so the domain never pulls in a specific RustCrypto
//! crate directly. Everything here follows §4.1 exactly: PBKDF2-HMAC-SHA256
//! key derivation, AES-256-CBC+PKCS7 for bulk and field payloads, and an
//! externally-stored SHA-256 digest rather than an AEAD tag.

use async_trait::async_trait;

use crate::error::DbError;
use crate::value_objects::key_material::{KeyMaterial, Salt};
use crate::value_objects::value::Value;

/// A symmetrically encrypted byte blob plus the IV used to produce it.
#[derive(Debug, Clone)]
pub struct Ciphertext {
    pub iv: Vec<u8>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait CryptoService: Send + Sync {
    /// Derives a 32-byte key from `passphrase`. Reuses `salt` if given,
    /// otherwise generates a fresh 32-byte random salt.
    async fn derive_key(&self, passphrase: &str, salt: Option<&Salt>) -> Result<(KeyMaterial, Salt), DbError>;

    /// AES-256-CBC with PKCS#7 padding, fresh random 16-byte IV per call.
    async fn encrypt(&self, plaintext: &[u8], key: &KeyMaterial) -> Result<Ciphertext, DbError>;

    /// Fails with `CryptoError` on padding failure or wrong key.
    async fn decrypt(&self, ciphertext: &Ciphertext, key: &KeyMaterial) -> Result<Vec<u8>, DbError>;

    /// SHA-256 of `bytes`, rendered as 64 lowercase hex characters.
    async fn digest(&self, bytes: &[u8]) -> String;

    /// Constant-time comparison against a digest previously produced by
    /// [`CryptoService::digest`].
    async fn verify_digest(&self, bytes: &[u8], expected_hex: &str) -> bool;

    /// JSON-serializes `value`, encrypts the UTF-8 bytes, and returns
    /// base64(iv || ciphertext).
    async fn encrypt_field(&self, value: &Value, key: &KeyMaterial) -> Result<String, DbError>;

    /// Inverse of [`CryptoService::encrypt_field`].
    async fn decrypt_field(&self, encoded: &str, key: &KeyMaterial) -> Result<Value, DbError>;

    /// Adaptive (bcrypt-style) passphrase hash, used only by the
    /// out-of-scope admin collaborator (§4.1, §6).
    async fn hash_passphrase(&self, passphrase: &str) -> Result<String, DbError>;

    async fn verify_passphrase(&self, passphrase: &str, hash: &str) -> Result<bool, DbError>;
}
