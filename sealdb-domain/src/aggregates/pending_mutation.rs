// /////////////////////////////////////////////////////////////////////////////
// SealDB
// Copyright (c) 2025 SealDB Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Cross-structure atomicity for document writes (§9 design note).
//!
//! Insert/update/delete each touch one document and every index on its
//! collection. Rather than mutating documents and indexes as each check
//! passes, the aggregate builds a `PendingMutation` describing the whole
//! intended change, validates it completely against the current state, and
//! only then applies it in a single pass that cannot fail. This is what
//! makes `Database`'s mutation methods all-or-nothing.

use crate::entities::document::Document;
use crate::value_objects::document_id::DocumentId;

/// The document-level half of a pending mutation; the aggregate derives
/// which indexes need touching from the affected collection's index set,
/// so this only needs to carry the before/after document snapshots.
#[derive(Debug, Clone)]
pub enum DocumentChange {
    Insert { id: DocumentId, document: Document },
    Replace { id: DocumentId, previous: Document, updated: Document },
    Remove { id: DocumentId, previous: Document },
}

#[derive(Debug, Clone)]
pub struct PendingMutation {
    pub collection: String,
    pub change: DocumentChange,
}

impl PendingMutation {
    pub fn insert(collection: impl Into<String>, id: DocumentId, document: Document) -> Self {
        Self { collection: collection.into(), change: DocumentChange::Insert { id, document } }
    }

    pub fn replace(collection: impl Into<String>, id: DocumentId, previous: Document, updated: Document) -> Self {
        Self { collection: collection.into(), change: DocumentChange::Replace { id, previous, updated } }
    }

    pub fn remove(collection: impl Into<String>, id: DocumentId, previous: Document) -> Self {
        Self { collection: collection.into(), change: DocumentChange::Remove { id, previous } }
    }
}
