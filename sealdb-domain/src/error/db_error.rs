// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A hierarchical error type for the SealDB domain. Each variant corresponds
//! to one of the failure categories a caller of the public engine surface can
//! observe: configuration, format/integrity of the on-disk container,
//! cryptography, schema validation, collection/document/index lifecycle, and
//! underlying storage I/O.
//!
//! Errors are cloneable so they can be attached to log records or metrics
//! without paying a second allocation, and they never carry the passphrase or
//! derived key material — only descriptive strings.

use thiserror::Error;

/// Domain-specific errors for the SealDB engine.
#[derive(Error, Debug, Clone)]
pub enum DbError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Format error: {0}")]
    FormatError(String),

    #[error("Integrity check failed: {0}")]
    IntegrityError(String),

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Collection error: {0}")]
    CollectionError(String),

    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("Unique constraint violated on field '{field}' with value {value}")]
    UniqueConstraintError { field: String, value: String },

    #[error("Storage error at '{path}': {message}")]
    StorageError { path: String, message: String },
}

impl DbError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::FormatError(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::IntegrityError(msg.into())
    }

    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::CryptoError(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaError(msg.into())
    }

    pub fn collection(msg: impl Into<String>) -> Self {
        Self::CollectionError(msg.into())
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::DocumentError(msg.into())
    }

    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    pub fn unique_constraint(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UniqueConstraintError {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn storage(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Errors that a caller may reasonably retry (transient I/O conditions).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DbError::StorageError { .. })
    }

    /// Errors that indicate a security-relevant failure (wrong key, tampering).
    pub fn is_security_error(&self) -> bool {
        matches!(self, DbError::CryptoError(_) | DbError::IntegrityError(_))
    }

    pub fn category(&self) -> &'static str {
        match self {
            DbError::ConfigError(_) => "configuration",
            DbError::FormatError(_) => "format",
            DbError::IntegrityError(_) => "integrity",
            DbError::CryptoError(_) => "crypto",
            DbError::ValidationError(_) => "validation",
            DbError::SchemaError(_) => "schema",
            DbError::CollectionError(_) => "collection",
            DbError::DocumentError(_) => "document",
            DbError::IndexError(_) => "index",
            DbError::UniqueConstraintError { .. } => "unique_constraint",
            DbError::StorageError { .. } => "storage",
        }
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::StorageError {
            path: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::ValidationError(format!("JSON error: {err}"))
    }
}

pub type DbResult<T> = Result<T, DbError>;
