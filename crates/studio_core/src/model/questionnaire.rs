//! Questionnaire configuration model.
//!
//! # Responsibility
//! - Define global section/question definitions and per-client overrides.
//! - Define the resolved (effective) shapes returned to form rendering.
//!
//! # Invariants
//! - Section and question ids are opaque strings owned by the external
//!   system of record.
//! - At most one override exists per `(client_id, target_id)` pair; an
//!   absent patch field means "inherit the global value".
//! - No resolved form is ever persisted; resolution is recomputed on every
//!   read so global edits are never served stale.

use serde::{Deserialize, Serialize};

/// Global definition of a questionnaire section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDef {
    /// Opaque stable identifier.
    pub id: String,
    /// Display title shown as the section header.
    pub title: String,
    /// Global ascending sort key.
    pub sort_order: i64,
    /// Global visibility default.
    pub enabled: bool,
}

/// Global definition of a questionnaire question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDef {
    /// Opaque stable identifier.
    pub id: String,
    /// Parent section id.
    pub section_id: String,
    /// Prompt text presented to the client.
    pub prompt: String,
    /// Global ascending sort key within the section.
    pub sort_order: i64,
    /// Global visibility default.
    pub enabled: bool,
}

/// Partial per-client patch applied over a global definition.
///
/// `None` fields inherit the global value; deleting the whole override
/// reverts every field at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridePatch {
    /// Overrides visibility when set.
    pub enabled: Option<bool>,
    /// Overrides the sort key when set.
    pub sort_order: Option<i64>,
    /// Overrides the title/prompt text when set.
    pub label: Option<String>,
}

impl OverridePatch {
    /// Returns true when every field inherits the global value.
    ///
    /// An empty patch is legal but pointless; callers may use this to prune
    /// no-op overrides instead of persisting them.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.sort_order.is_none() && self.label.is_none()
    }
}

/// Per-client override of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOverride {
    /// Client the override applies to.
    pub client_id: String,
    /// Target section id.
    pub section_id: String,
    /// Partial patch over the global definition.
    pub patch: OverridePatch,
}

/// Per-client override of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOverride {
    /// Client the override applies to.
    pub client_id: String,
    /// Target question id.
    pub question_id: String,
    /// Partial patch over the global definition.
    pub patch: OverridePatch,
}

/// Effective section after merging global defaults with a client override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSection {
    /// Global section id.
    pub id: String,
    /// Effective title (override label wins when present).
    pub title: String,
    /// Effective sort key.
    pub sort_order: i64,
}

/// Effective question after merging global defaults with a client override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuestion {
    /// Global question id.
    pub id: String,
    /// Parent section id.
    pub section_id: String,
    /// Effective prompt (override label wins when present).
    pub prompt: String,
    /// Effective sort key within the section.
    pub sort_order: i64,
}
