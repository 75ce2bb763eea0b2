// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Single-writer save queue (§5, §9 design notes).
//!
//! Modeled as a mutex-guarded job slot rather than a channel: at most one
//! save runs at a time, and `tokio::sync::Mutex` resolves waiters in
//! acquisition order, giving the FIFO ordering §5 requires without a
//! separate task or response channel. Callers hold the guard only for the
//! duration of their own save; there is no long-lived background task to
//! shut down.

use tokio::sync::Mutex;
use tracing::debug;

/// Serializes calls to the file codec's `save`/`backup` so that at most one
/// write to the container is in flight. Holds no data of its own — the slot
/// is the lock itself.
#[derive(Debug, Default)]
pub struct SaveQueue {
    slot: Mutex<()>,
}

impl SaveQueue {
    pub fn new() -> Self {
        Self { slot: Mutex::new(()) }
    }

    /// Runs `job` with exclusive access to the save slot. Enqueued callers
    /// are admitted one at a time in the order they started waiting.
    pub async fn run_exclusive<F, Fut, T>(&self, job: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let _permit = self.slot.lock().await;
        debug!("save queue slot acquired");
        let result = job().await;
        debug!("save queue slot released");
        result
    }
}
