// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Derived encryption key material.
//!
//! `KeyMaterial` owns the 32-byte key produced by `derive_key` (§4.1). It is
//! zeroized on drop so a dropped database instance does not leave the key
//! sitting in freed memory, and its `Debug` impl never prints the bytes.

use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_LEN: usize = 32;
pub const SALT_LEN: usize = 32;
pub const IV_LEN: usize = 16;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    key: [u8; KEY_LEN],
}

impl KeyMaterial {
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial").field("key", &"<redacted>").finish()
    }
}

/// A random salt used to derive the database key from a passphrase. Unlike
/// the key itself this is stored on disk in the container header, so it is
/// not zeroized — it carries no secrecy, only uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_material_debug_never_prints_bytes() {
        let km = KeyMaterial::new([0x42; KEY_LEN]);
        let rendered = format!("{km:?}");
        assert!(!rendered.contains("66")); // 0x42 decimal, shouldn't leak as a number either
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn salt_reports_length() {
        let salt = Salt::new(vec![0u8; SALT_LEN]);
        assert_eq!(salt.len(), SALT_LEN);
        assert!(!salt.is_empty());
    }
}
