// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SealDB Bootstrap
//!
//! Ambient wiring for a host embedding SealDB. This crate sits outside the
//! `sealdb-domain` / `sealdb` layering and provides only:
//!
//! - **Logging init** — installs a `tracing` subscriber at a requested
//!   verbosity ([`init_tracing`]), plus the bootstrap-phase-only
//!   [`logger::BootstrapLogger`] abstraction for messages emitted before a
//!   subscriber necessarily exists.
//! - **Configuration loading** — [`config::BootstrapConfig`] layers an
//!   optional TOML file over engine defaults.
//! - **Composition root** — [`open`] wires the concrete `Aes256CbcCrypto` /
//!   `VdbFileCodec` adapters into a `DatabaseEngine` the way a host
//!   application would, rather than making every embedder re-derive it.
//!
//! It deliberately does **not** contain a CLI, an HTTP surface, signal
//! handling, or process lifecycle management — those are a host
//! application's concern, not the database's.

pub mod config;
pub mod logger;

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sealdb::{Aes256CbcCrypto, DatabaseEngine, DbError, VdbFileCodec};

pub use config::{BootstrapConfig, LogLevel};
pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};

/// The concrete engine type a host gets from [`open`]: the RustCrypto-backed
/// `CryptoService` over the VDB1 `FileCodecService`.
pub type Engine = DatabaseEngine<Aes256CbcCrypto, VdbFileCodec<Aes256CbcCrypto>>;

/// Installs a process-wide `tracing` subscriber filtered at `log_level`,
/// honoring `RUST_LOG` if set. Call once, before [`open`]; calling it twice
/// in the same process returns an error from the underlying subscriber crate
/// rather than panicking.
pub fn init_tracing(log_level: LogLevel) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_tracing_level().to_string()));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(anyhow::Error::from)?;

    Ok(())
}

/// Composition root: builds the default crypto and file-codec adapters and
/// opens the VDB1 container at `config.database.path`, creating it on first
/// use. This is the wiring a host application would otherwise have to
/// duplicate — see `sealdb::application::services::DatabaseEngine::open`
/// for the underlying call.
pub async fn open(config: &BootstrapConfig, passphrase: &str) -> Result<Engine, DbError> {
    let crypto = Arc::new(Aes256CbcCrypto::new());
    let codec = Arc::new(VdbFileCodec::new(Aes256CbcCrypto::new()));
    Engine::open(crypto, codec, &config.database.path, passphrase).await
}

/// Convenience entry point for the common case: read `config_path` (if it
/// exists) over the engine defaults, install logging, and open the
/// database at `path`.
pub async fn bootstrap(config_path: &Path, path: impl Into<std::path::PathBuf>, passphrase: &str, log_level: LogLevel) -> Result<Engine, anyhow::Error> {
    let config = BootstrapConfig::load(config_path, path, log_level).await?;
    init_tracing(config.log_level)?;
    let engine = open(&config, passphrase).await?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_a_fresh_database_at_the_configured_path() {
        use std::collections::BTreeMap;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bootstrap.vdb");
        let config = BootstrapConfig::new(&path);

        let engine = open(&config, "correct horse battery staple").await.unwrap();

        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), sealdb::Value::from("string"));
        engine.create_collection("widgets", &sealdb::Value::Object(fields), vec![]).await.unwrap();

        assert!(tokio::fs::try_exists(&path).await.unwrap());
    }
}
