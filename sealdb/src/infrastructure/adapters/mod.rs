// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod crypto;
pub mod file_codec;

pub use crypto::Aes256CbcCrypto;
pub use file_codec::VdbFileCodec;
