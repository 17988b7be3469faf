//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical quick-capture record and its lifecycle helpers.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another entry.
//! - `content` is stored in stable mention form (`@[id]` tokens), so client
//!   renames never require rewriting persisted text.
//! - `is_deleted` is the source of truth for tombstone state.
//!
//! # See also
//! - docs/architecture/data-model.md

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a journal entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = Uuid;

/// Canonical journal quick-capture record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Stable global ID used for linking and auditing.
    pub uuid: EntryId,
    /// Free text in stable mention form.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    /// Soft delete tombstone, preserved for history/recovery.
    pub is_deleted: bool,
}

impl JournalEntry {
    /// Creates a new entry with a generated stable ID.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), content)
    }

    /// Creates a new entry with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(uuid: EntryId, content: impl Into<String>) -> Self {
        Self {
            uuid,
            content: content.into(),
            created_at: 0,
            updated_at: 0,
            is_deleted: false,
        }
    }

    /// Marks this entry as softly deleted (tombstoned).
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Clears the soft delete flag.
    pub fn restore(&mut self) {
        self.is_deleted = false;
    }

    /// Returns whether this entry should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
