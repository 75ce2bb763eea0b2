// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod database_engine;

pub use database_engine::{CollectionStats, DatabaseEngine, DeleteOutcome, ExportCollection, ExportTree, UpdateOutcome};
