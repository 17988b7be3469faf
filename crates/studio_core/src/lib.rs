//! Core domain logic for the studio journal and questionnaire features.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod mention;
pub mod model;
pub mod questionnaire;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use mention::{annotate_mentions, parse_mentions, render_mentions, render_segments, MentionScan, Segment};
pub use model::entry::{EntryId, JournalEntry};
pub use model::questionnaire::{
    OverridePatch, QuestionDef, QuestionOverride, ResolvedQuestion, ResolvedSection, SectionDef,
    SectionOverride,
};
pub use model::roster::{EntityKind, RosterEntry};
pub use questionnaire::{resolve_questions, resolve_sections};
pub use repo::entry_repo::{EntryListQuery, EntryRecord, EntryRepository, SqliteEntryRepository};
pub use repo::questionnaire_repo::{QuestionnaireRepository, SqliteQuestionnaireRepository};
pub use repo::roster_repo::{RosterRepository, SqliteRosterRepository};
pub use repo::{RepoError, RepoResult};
pub use service::journal_service::{EntriesListResult, JournalService, JournalServiceError};
pub use service::questionnaire_service::{
    ClientForm, FormSection, QuestionnaireService, QuestionnaireServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
