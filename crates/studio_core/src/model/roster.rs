//! Roster model: the entities a journal entry can mention.
//!
//! # Responsibility
//! - Describe the caller-supplied snapshot of known clients and projects.
//!
//! # Invariants
//! - `id` values are opaque and owned by the external system of record;
//!   core never mints or mutates them.
//! - A roster snapshot is immutable for the duration of one parse call.

use serde::{Deserialize, Serialize};

/// Category of a mentionable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Agency client account.
    Client,
    /// Project belonging to a client.
    Project,
}

/// One mentionable entity in the caller-supplied roster snapshot.
///
/// Provided fresh per parse call; core keeps no copy between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// External stable identifier.
    pub id: String,
    /// Current display name matched against `@Name` tokens.
    pub name: String,
    /// Entity category.
    pub kind: EntityKind,
}

impl RosterEntry {
    /// Convenience constructor for callers building snapshots by hand.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}
