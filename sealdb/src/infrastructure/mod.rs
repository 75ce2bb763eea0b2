// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Infrastructure layer: concrete adapters for the domain's `CryptoService`
//! and `FileCodecService` ports, plus the single-writer save queue that
//! serializes the atomic file writes those adapters perform.

pub mod adapters;
pub mod repositories;
