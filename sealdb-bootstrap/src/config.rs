// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Configuration
//!
//! Ties together the two ambient concerns a host embedding SealDB has to
//! decide before calling [`crate::open`][crate::open]: how verbosely to log,
//! and where the [`DatabaseConfig`] comes from. Neither belongs in
//! `sealdb-domain` or `sealdb` itself — both crates are usable without ever
//! touching this one.

use std::path::{Path, PathBuf};

use sealdb::DatabaseConfig;
use sealdb_domain::error::DbError;

/// Verbosity for the `tracing` subscriber installed by
/// [`crate::init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    /// Maps to the `tracing::Level` the subscriber is filtered at.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Everything a host needs to stand a `DatabaseEngine` up: the engine's own
/// tunables plus how loudly bootstrap and the engine should log.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub database: DatabaseConfig,
    pub log_level: LogLevel,
}

impl BootstrapConfig {
    /// Configuration pointing at `path` with the documented `DatabaseConfig`
    /// defaults and [`LogLevel::Info`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { database: DatabaseConfig::new(path), log_level: LogLevel::default() }
    }

    /// Loads the `DatabaseConfig` half from an optional TOML file (see
    /// [`DatabaseConfig::load`]); `log_level` is not part of that file and
    /// stays at the caller-supplied value, since it governs process-wide
    /// logging rather than a single engine instance.
    pub async fn load(config_path: &Path, path: impl Into<PathBuf>, log_level: LogLevel) -> Result<Self, DbError> {
        let database = DatabaseConfig::load(config_path, path).await?;
        Ok(Self { database, log_level })
    }
}
