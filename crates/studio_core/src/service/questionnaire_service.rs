//! Questionnaire use-case service.
//!
//! # Responsibility
//! - Produce the effective per-client form from global definitions and the
//!   override store.
//! - Provide override upsert/clear entry points for operator customization.
//!
//! # Invariants
//! - The resolved form is computed fresh on every call; nothing merged is
//!   cached or persisted.
//! - Clearing an override reverts the next resolution to global defaults.

use crate::model::questionnaire::{
    QuestionDef, QuestionOverride, ResolvedQuestion, ResolvedSection, SectionDef, SectionOverride,
};
use crate::questionnaire::{resolve_questions, resolve_sections};
use crate::repo::questionnaire_repo::QuestionnaireRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for questionnaire use-cases.
#[derive(Debug)]
pub enum QuestionnaireServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for QuestionnaireServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QuestionnaireServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for QuestionnaireServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One resolved section with its resolved questions, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSection {
    pub section: ResolvedSection,
    pub questions: Vec<ResolvedQuestion>,
}

/// The effective form to present to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientForm {
    pub client_id: String,
    pub sections: Vec<FormSection>,
}

/// Questionnaire service facade over repository implementations.
pub struct QuestionnaireService<R: QuestionnaireRepository> {
    repo: R,
}

impl<R: QuestionnaireRepository> QuestionnaireService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts or replaces one global section definition.
    pub fn upsert_section(&self, section: &SectionDef) -> RepoResult<()> {
        self.repo.upsert_section(section)
    }

    /// Inserts or replaces one global question definition.
    pub fn upsert_question(&self, question: &QuestionDef) -> RepoResult<()> {
        self.repo.upsert_question(question)
    }

    /// Computes the effective form for one client.
    ///
    /// Loads the global definitions and the client's override snapshot,
    /// resolves sections, then questions, and groups questions under their
    /// sections in display order.
    pub fn form_for_client(
        &self,
        client_id: &str,
    ) -> Result<ClientForm, QuestionnaireServiceError> {
        let global_sections = self.repo.load_sections()?;
        let global_questions = self.repo.load_questions()?;
        let section_overrides = self.repo.load_section_overrides(client_id)?;
        let question_overrides = self.repo.load_question_overrides(client_id)?;

        let sections = resolve_sections(&global_sections, &section_overrides);
        let questions = resolve_questions(&global_questions, &question_overrides, &sections);

        let mut form_sections: Vec<FormSection> = sections
            .into_iter()
            .map(|section| FormSection {
                section,
                questions: Vec::new(),
            })
            .collect();
        for question in questions {
            // resolve_questions only emits questions whose parent section
            // survived resolution, so the lookup always succeeds.
            if let Some(slot) = form_sections
                .iter_mut()
                .find(|fs| fs.section.id == question.section_id)
            {
                slot.questions.push(question);
            }
        }

        Ok(ClientForm {
            client_id: client_id.to_string(),
            sections: form_sections,
        })
    }

    /// Inserts or replaces one client's section override.
    pub fn set_section_override(&self, row: &SectionOverride) -> RepoResult<()> {
        self.repo.upsert_section_override(row)?;
        info!(
            "event=override_set module=questionnaire status=ok target_kind=section client_id={} target_id={}",
            row.client_id, row.section_id
        );
        Ok(())
    }

    /// Inserts or replaces one client's question override.
    pub fn set_question_override(&self, row: &QuestionOverride) -> RepoResult<()> {
        self.repo.upsert_question_override(row)?;
        info!(
            "event=override_set module=questionnaire status=ok target_kind=question client_id={} target_id={}",
            row.client_id, row.question_id
        );
        Ok(())
    }

    /// Removes one client's section override; returns whether it existed.
    pub fn clear_section_override(&self, client_id: &str, section_id: &str) -> RepoResult<bool> {
        self.repo.delete_section_override(client_id, section_id)
    }

    /// Removes one client's question override; returns whether it existed.
    pub fn clear_question_override(&self, client_id: &str, question_id: &str) -> RepoResult<bool> {
        self.repo.delete_question_override(client_id, question_id)
    }
}
