// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Infrastructure module - concrete implementation of a domain port.
//! # Crypto Service Implementation
//!
//! Concrete `CryptoService` adapter implementing §4.1 exactly:
//! PBKDF2-HMAC-SHA256 key derivation (100000 iterations, 32-byte output),
//! AES-256-CBC with PKCS#7 padding for bulk and field payloads, SHA-256 for
//! the integrity digest, and bcrypt for the optional passphrase hash used
//! only by the out-of-scope admin collaborator.
//!
//! This deliberately does not use an AEAD cipher: the file format carries
//! its own externally-stored digest (§4.2), so authenticated encryption
//! is not needed inside this primitive.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use async_trait::async_trait;
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use sealdb_domain::error::DbError;
use sealdb_domain::services::crypto_service::{Ciphertext, CryptoService};
use sealdb_domain::value_objects::key_material::{KeyMaterial, Salt, IV_LEN, KEY_LEN, SALT_LEN};
use sealdb_domain::value_objects::value::Value;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const PBKDF2_ITERATIONS: u32 = 100_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct Aes256CbcCrypto;

impl Aes256CbcCrypto {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CryptoService for Aes256CbcCrypto {
    async fn derive_key(&self, passphrase: &str, salt: Option<&Salt>) -> Result<(KeyMaterial, Salt), DbError> {
        let salt = match salt {
            Some(s) => s.clone(),
            None => {
                let mut bytes = vec![0u8; SALT_LEN];
                rand::rng().fill_bytes(&mut bytes);
                Salt::new(bytes)
            }
        };
        let mut key = [0u8; KEY_LEN];
        pbkdf2::<Hmac<Sha256>>(passphrase.as_bytes(), salt.as_bytes(), PBKDF2_ITERATIONS, &mut key)
            .map_err(|e| DbError::crypto(format!("Key derivation failed: {e}")))?;
        Ok((KeyMaterial::new(key), salt))
    }

    async fn encrypt(&self, plaintext: &[u8], key: &KeyMaterial) -> Result<Ciphertext, DbError> {
        let mut iv = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut iv);
        let key_arr = GenericArray::from_slice(key.as_bytes());
        let iv_arr = GenericArray::from_slice(&iv);
        let ciphertext = Aes256CbcEnc::new(key_arr, iv_arr).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        Ok(Ciphertext { iv: iv.to_vec(), bytes: ciphertext })
    }

    async fn decrypt(&self, ciphertext: &Ciphertext, key: &KeyMaterial) -> Result<Vec<u8>, DbError> {
        if ciphertext.iv.len() != IV_LEN {
            return Err(DbError::crypto("Invalid initialization vector length"));
        }
        let key_arr = GenericArray::from_slice(key.as_bytes());
        let iv_arr = GenericArray::from_slice(&ciphertext.iv);
        Aes256CbcDec::new(key_arr, iv_arr)
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext.bytes)
            .map_err(|_| DbError::crypto("Decryption failed: wrong passphrase or corrupt payload"))
    }

    async fn digest(&self, bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    async fn verify_digest(&self, bytes: &[u8], expected_hex: &str) -> bool {
        let actual = Sha256::digest(bytes);
        let expected = match hex::decode(expected_hex) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        actual.as_slice().ct_eq(&expected).into()
    }

    async fn encrypt_field(&self, value: &Value, key: &KeyMaterial) -> Result<String, DbError> {
        let json = serde_json::to_vec(&value.to_json())?;
        let ciphertext = self.encrypt(&json, key).await?;
        let mut combined = ciphertext.iv;
        combined.extend_from_slice(&ciphertext.bytes);
        Ok(base64::Engine::encode(&base64::engine::general_purpose::STANDARD, combined))
    }

    async fn decrypt_field(&self, encoded: &str, key: &KeyMaterial) -> Result<Value, DbError> {
        let combined = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded)
            .map_err(|e| DbError::crypto(format!("Invalid base64 field payload: {e}")))?;
        if combined.len() < IV_LEN {
            return Err(DbError::crypto("Encrypted field payload too short"));
        }
        let (iv, body) = combined.split_at(IV_LEN);
        let plaintext = self.decrypt(&Ciphertext { iv: iv.to_vec(), bytes: body.to_vec() }, key).await?;
        let json: serde_json::Value = serde_json::from_slice(&plaintext)
            .map_err(|e| DbError::crypto(format!("Decrypted field is not valid JSON: {e}")))?;
        Ok(Value::from_json(json))
    }

    async fn hash_passphrase(&self, passphrase: &str) -> Result<String, DbError> {
        bcrypt::hash(passphrase, bcrypt::DEFAULT_COST).map_err(|e| DbError::crypto(format!("Passphrase hashing failed: {e}")))
    }

    async fn verify_passphrase(&self, passphrase: &str, hash: &str) -> Result<bool, DbError> {
        bcrypt::verify(passphrase, hash).map_err(|e| DbError::crypto(format!("Passphrase verification failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn encrypt_then_decrypt_round_trips() {
        let crypto = Aes256CbcCrypto::new();
        let (key, _salt) = crypto.derive_key("pw-one", None).await.unwrap();
        let ciphertext = crypto.encrypt(b"hello world", &key).await.unwrap();
        let plaintext = crypto.decrypt(&ciphertext, &key).await.unwrap();
        assert_eq!(plaintext, b"hello world");
    }

    #[tokio::test]
    async fn wrong_key_fails_to_decrypt() {
        let crypto = Aes256CbcCrypto::new();
        let (key_a, salt) = crypto.derive_key("alpha", None).await.unwrap();
        let (key_b, _) = crypto.derive_key("beta", Some(&salt)).await.unwrap();
        let ciphertext = crypto.encrypt(b"secret payload", &key_a).await.unwrap();
        assert!(crypto.decrypt(&ciphertext, &key_b).await.is_err());
    }

    #[tokio::test]
    async fn digest_is_stable_and_verifiable() {
        let crypto = Aes256CbcCrypto::new();
        let digest = crypto.digest(b"payload").await;
        assert_eq!(digest.len(), 64);
        assert!(crypto.verify_digest(b"payload", &digest).await);
        assert!(!crypto.verify_digest(b"tampered", &digest).await);
    }

    #[tokio::test]
    async fn encrypted_field_round_trips_through_base64() {
        let crypto = Aes256CbcCrypto::new();
        let (key, _) = crypto.derive_key("pw", None).await.unwrap();
        let value = Value::from("123-45-6789");
        let encoded = crypto.encrypt_field(&value, &key).await.unwrap();
        assert!(!encoded.contains("123-45-6789"));
        let decoded = crypto.decrypt_field(&encoded, &key).await.unwrap();
        assert_eq!(decoded.as_str(), Some("123-45-6789"));
    }
}
