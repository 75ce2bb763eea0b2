// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Database Configuration
//!
//! Tunable, non-secret parameters for a `DatabaseEngine` instance. The
//! passphrase is deliberately not a field here — it is supplied per-call to
//! `DatabaseEngine::open` and never persisted or logged (§4.5, §5).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
const DEFAULT_OPERATION_LOG_BOUND: usize = 1000;
const DEFAULT_GZIP_LEVEL: u32 = 6;
const DEFAULT_SAVE_QUEUE_DEPTH: usize = 32;

/// Configuration for a single `DatabaseEngine` instance.
///
/// Loaded from a TOML file merged over these defaults via
/// [`DatabaseConfig::load`], or constructed directly with
/// [`DatabaseConfig::new`] for programmatic embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the VDB1 container file.
    pub path: PathBuf,

    /// PBKDF2-HMAC-SHA256 iteration count. Override only for tests; lowering
    /// it for production use weakens key derivation.
    pub pbkdf2_iterations: u32,

    /// Maximum retained operation log entries, trimmed before each save.
    /// Must not exceed the format's historical cap of 1000.
    pub operation_log_bound: usize,

    /// Gzip compression level (0-9) applied to the JSON image before
    /// encryption.
    pub gzip_level: u32,

    /// Depth hint for callers queueing concurrent save requests; the save
    /// queue itself admits one writer at a time regardless of this value.
    pub save_queue_depth: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
            operation_log_bound: DEFAULT_OPERATION_LOG_BOUND,
            gzip_level: DEFAULT_GZIP_LEVEL,
            save_queue_depth: DEFAULT_SAVE_QUEUE_DEPTH,
        }
    }
}

impl DatabaseConfig {
    /// Configuration pointing at `path`, otherwise using the documented
    /// defaults.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }

    /// Loads configuration layered on top of the defaults: an optional TOML
    /// file at `config_path` (if present) overrides defaults field-by-field;
    /// the caller-supplied `path` always wins over both, since the engine's
    /// target file is a runtime concern, not a packaged default.
    pub async fn load(config_path: &std::path::Path, path: impl Into<PathBuf>) -> Result<Self, sealdb_domain::error::DbError> {
        let mut config = Self::default();

        if tokio::fs::try_exists(config_path)
            .await
            .map_err(|e| sealdb_domain::error::DbError::config(format!("Failed to probe config file {config_path:?}: {e}")))?
        {
            let raw = tokio::fs::read_to_string(config_path)
                .await
                .map_err(|e| sealdb_domain::error::DbError::config(format!("Failed to read config file {config_path:?}: {e}")))?;
            config = toml::from_str(&raw)
                .map_err(|e| sealdb_domain::error::DbError::config(format!("Failed to parse config file {config_path:?}: {e}")))?;
        }

        config.path = path.into();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let config = DatabaseConfig::new("/tmp/a.vdb");
        assert_eq!(config.pbkdf2_iterations, 100_000);
        assert_eq!(config.operation_log_bound, 1000);
        assert_eq!(config.gzip_level, 6);
        assert_eq!(config.path, std::path::PathBuf::from("/tmp/a.vdb"));
    }

    #[tokio::test]
    async fn loading_a_missing_config_file_falls_back_to_defaults() {
        let config = DatabaseConfig::load(std::path::Path::new("/nonexistent/sealdb.toml"), "/tmp/a.vdb").await.unwrap();
        assert_eq!(config.pbkdf2_iterations, 100_000);
    }
}
