//! Domain model for journal capture and questionnaire resolution.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one shape per concept shared by parser, resolver and storage.
//!
//! # Invariants
//! - Journal entries are identified by a stable `EntryId`.
//! - Roster and questionnaire rows carry opaque string ids owned by the
//!   external system of record.
//! - Deletion of entries is represented by soft-delete tombstones.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod entry;
pub mod questionnaire;
pub mod roster;
