// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod operation_log;

pub use operation_log::{OperationLog, OperationLogEntry, MAX_OPERATION_LOG_ENTRIES};
