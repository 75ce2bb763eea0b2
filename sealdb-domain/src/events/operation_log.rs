// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The bounded (≤1000) operation log persisted with every save (§3, §4.2).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_OPERATION_LOG_ENTRIES: usize = 1000;

/// One structural-change audit entry: `{operation, details, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLogEntry {
    pub operation: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl OperationLogEntry {
    pub fn new(operation: impl Into<String>, details: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { operation: operation.into(), details: details.into(), timestamp }
    }
}

/// A bounded FIFO of operation log entries, trimmed to the most recent
/// [`MAX_OPERATION_LOG_ENTRIES`] before each save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationLog {
    entries: VecDeque<OperationLogEntry>,
}

impl OperationLog {
    pub fn push(&mut self, entry: OperationLogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_OPERATION_LOG_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &OperationLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `compact()`: clears the log; the caller is responsible for
    /// triggering the subsequent save (§4.2).
    pub fn compact(&mut self) {
        self.entries.clear();
    }
}
