//! Journal quick-capture service.
//!
//! # Responsibility
//! - Capture free text: parse mentions/tags, rewrite to stable form,
//!   persist the entry and its links.
//! - Render stored entries for display with current entity names.
//!
//! # Invariants
//! - `revise` uses full content replacement semantics; links are recomputed
//!   from the new text, never merged.
//! - Capture/revise persist the entry row and its link set in one
//!   transaction; a failed write leaves no partial state behind.
//! - Entry list is always sorted by `updated_at DESC, uuid ASC`.
//! - Stored content is in stable mention form; display never mutates it.
//!
//! # See also
//! - docs/architecture/mention-links.md

use crate::mention::{annotate_mentions, parse_mentions, render_mentions, render_segments, Segment};
use crate::model::entry::{EntryId, JournalEntry};
use crate::model::roster::RosterEntry;
use crate::repo::entry_repo::{
    normalize_entry_limit, normalize_tag, EntryListQuery, EntryRecord, EntryRepository,
};
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalServiceError {
    /// Target entry does not exist.
    EntryNotFound(EntryId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for JournalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryNotFound(entry_id) => write!(f, "entry not found: {entry_id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent entry state: {details}"),
        }
    }
}

impl Error for JournalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for JournalServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(entry_id) => Self::EntryNotFound(entry_id),
            other => Self::Repo(other),
        }
    }
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntriesListResult {
    /// List items sorted by `updated_at DESC, uuid ASC`.
    pub items: Vec<EntryRecord>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Journal service facade over repository implementations.
pub struct JournalService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> JournalService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Captures one journal entry from raw free text.
    ///
    /// Mentions resolvable against `roster` are rewritten to stable form
    /// before persistence; the entry row and its resolved id/tag links
    /// commit in one transaction, so a failed capture leaves nothing
    /// behind.
    pub fn capture(
        &mut self,
        raw_text: impl Into<String>,
        roster: &[RosterEntry],
    ) -> Result<EntryRecord, JournalServiceError> {
        let raw_text = raw_text.into();
        let scan = parse_mentions(&raw_text, roster);
        let stable = annotate_mentions(&raw_text, roster);

        let entry = JournalEntry::new(stable);
        let entry_id =
            self.repo
                .create_entry_with_links(&entry, &scan.tags, &scan.mentioned_ids)?;

        info!(
            "event=entry_captured module=journal status=ok entry_id={entry_id} mentions={} tags={}",
            scan.mentioned_ids.len(),
            scan.tags.len()
        );

        self.repo
            .get_entry(entry_id)?
            .ok_or(JournalServiceError::InconsistentState(
                "captured entry not found in read-back",
            ))
    }

    /// Replaces entry content fully and recomputes links from the new text.
    ///
    /// Content and links commit in one transaction; a failed revision
    /// leaves the previous content and links intact.
    pub fn revise(
        &mut self,
        entry_id: EntryId,
        raw_text: impl Into<String>,
        roster: &[RosterEntry],
    ) -> Result<EntryRecord, JournalServiceError> {
        let raw_text = raw_text.into();
        let scan = parse_mentions(&raw_text, roster);
        let stable = annotate_mentions(&raw_text, roster);

        self.repo.update_entry_with_links(
            entry_id,
            stable.as_str(),
            &scan.tags,
            &scan.mentioned_ids,
        )?;

        self.repo
            .get_entry(entry_id)?
            .ok_or(JournalServiceError::InconsistentState(
                "revised entry not found in read-back",
            ))
    }

    /// Gets one entry by stable ID.
    pub fn get_entry(&self, entry_id: EntryId) -> RepoResult<Option<EntryRecord>> {
        self.repo.get_entry(entry_id)
    }

    /// Renders one entry to plain display text with current names.
    pub fn display(
        &self,
        entry_id: EntryId,
        names: &HashMap<String, String>,
    ) -> Result<String, JournalServiceError> {
        let record = self
            .repo
            .get_entry(entry_id)?
            .ok_or(JournalServiceError::EntryNotFound(entry_id))?;
        Ok(render_mentions(&record.content, names))
    }

    /// Renders one entry to structured segments for linked display.
    pub fn display_segments(
        &self,
        entry_id: EntryId,
        names: &HashMap<String, String>,
    ) -> Result<Vec<Segment>, JournalServiceError> {
        let record = self
            .repo
            .get_entry(entry_id)?
            .ok_or(JournalServiceError::EntryNotFound(entry_id))?;
        Ok(render_segments(&record.content, names))
    }

    /// Lists entries using optional single-tag filter and pagination.
    pub fn list(
        &self,
        tag: Option<String>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<EntriesListResult, JournalServiceError> {
        let normalized_tag = tag.and_then(|value| normalize_tag(value.as_str()));
        let applied_limit = normalize_entry_limit(limit);
        let query = EntryListQuery {
            tag: normalized_tag,
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_entries(&query)?;
        Ok(EntriesListResult {
            items,
            applied_limit,
        })
    }

    /// Soft-deletes one entry.
    pub fn delete(&self, entry_id: EntryId) -> Result<(), JournalServiceError> {
        self.repo.soft_delete_entry(entry_id)?;
        Ok(())
    }

    /// Lists normalized tags known by storage.
    pub fn list_tags(&self) -> RepoResult<Vec<String>> {
        self.repo.list_tags()
    }
}
