//! Questionnaire repository: global definitions and per-client overrides.
//!
//! # Responsibility
//! - Persist section/question definitions and the override store.
//! - Load per-client override snapshots for the resolution pass.
//!
//! # Invariants
//! - At most one override row exists per `(client_id, target_id)` pair,
//!   enforced by the primary key; upsert replaces the whole patch.
//! - Deleting an override is a plain row delete; the next resolution falls
//!   back to global defaults with no special casing.

use crate::model::questionnaire::{
    OverridePatch, QuestionDef, QuestionOverride, SectionDef, SectionOverride,
};
use crate::repo::{table_exists, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for questionnaire configuration.
pub trait QuestionnaireRepository {
    /// Inserts or replaces one global section definition.
    fn upsert_section(&self, section: &SectionDef) -> RepoResult<()>;
    /// Inserts or replaces one global question definition.
    fn upsert_question(&self, question: &QuestionDef) -> RepoResult<()>;
    /// Loads all global section definitions.
    fn load_sections(&self) -> RepoResult<Vec<SectionDef>>;
    /// Loads all global question definitions.
    fn load_questions(&self) -> RepoResult<Vec<QuestionDef>>;
    /// Inserts or replaces one client's override for a section.
    fn upsert_section_override(&self, row: &SectionOverride) -> RepoResult<()>;
    /// Inserts or replaces one client's override for a question.
    fn upsert_question_override(&self, row: &QuestionOverride) -> RepoResult<()>;
    /// Loads one client's section overrides.
    fn load_section_overrides(&self, client_id: &str) -> RepoResult<Vec<SectionOverride>>;
    /// Loads one client's question overrides.
    fn load_question_overrides(&self, client_id: &str) -> RepoResult<Vec<QuestionOverride>>;
    /// Deletes one section override; returns whether a row existed.
    fn delete_section_override(&self, client_id: &str, section_id: &str) -> RepoResult<bool>;
    /// Deletes one question override; returns whether a row existed.
    fn delete_question_override(&self, client_id: &str, question_id: &str) -> RepoResult<bool>;
}

/// SQLite-backed questionnaire repository.
pub struct SqliteQuestionnaireRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionnaireRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in [
            "sections",
            "questions",
            "section_overrides",
            "question_overrides",
        ] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl QuestionnaireRepository for SqliteQuestionnaireRepository<'_> {
    fn upsert_section(&self, section: &SectionDef) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO sections (id, title, sort_order, enabled)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                sort_order = excluded.sort_order,
                enabled = excluded.enabled;",
            params![
                section.id,
                section.title,
                section.sort_order,
                i64::from(section.enabled),
            ],
        )?;
        Ok(())
    }

    fn upsert_question(&self, question: &QuestionDef) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO questions (id, section_id, prompt, sort_order, enabled)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                section_id = excluded.section_id,
                prompt = excluded.prompt,
                sort_order = excluded.sort_order,
                enabled = excluded.enabled;",
            params![
                question.id,
                question.section_id,
                question.prompt,
                question.sort_order,
                i64::from(question.enabled),
            ],
        )?;
        Ok(())
    }

    fn load_sections(&self) -> RepoResult<Vec<SectionDef>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, sort_order, enabled
             FROM sections
             ORDER BY sort_order ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            let enabled: i64 = row.get("enabled")?;
            sections.push(SectionDef {
                id: row.get("id")?,
                title: row.get("title")?,
                sort_order: row.get("sort_order")?,
                enabled: enabled != 0,
            });
        }
        Ok(sections)
    }

    fn load_questions(&self) -> RepoResult<Vec<QuestionDef>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, section_id, prompt, sort_order, enabled
             FROM questions
             ORDER BY section_id ASC, sort_order ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            let enabled: i64 = row.get("enabled")?;
            questions.push(QuestionDef {
                id: row.get("id")?,
                section_id: row.get("section_id")?,
                prompt: row.get("prompt")?,
                sort_order: row.get("sort_order")?,
                enabled: enabled != 0,
            });
        }
        Ok(questions)
    }

    fn upsert_section_override(&self, row: &SectionOverride) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO section_overrides (client_id, section_id, enabled, sort_order, label)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (client_id, section_id) DO UPDATE SET
                enabled = excluded.enabled,
                sort_order = excluded.sort_order,
                label = excluded.label;",
            params![
                row.client_id,
                row.section_id,
                row.patch.enabled.map(i64::from),
                row.patch.sort_order,
                row.patch.label,
            ],
        )?;
        Ok(())
    }

    fn upsert_question_override(&self, row: &QuestionOverride) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO question_overrides (client_id, question_id, enabled, sort_order, label)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (client_id, question_id) DO UPDATE SET
                enabled = excluded.enabled,
                sort_order = excluded.sort_order,
                label = excluded.label;",
            params![
                row.client_id,
                row.question_id,
                row.patch.enabled.map(i64::from),
                row.patch.sort_order,
                row.patch.label,
            ],
        )?;
        Ok(())
    }

    fn load_section_overrides(&self, client_id: &str) -> RepoResult<Vec<SectionOverride>> {
        let mut stmt = self.conn.prepare(
            "SELECT client_id, section_id, enabled, sort_order, label
             FROM section_overrides
             WHERE client_id = ?1
             ORDER BY section_id ASC;",
        )?;
        let mut rows = stmt.query([client_id])?;
        let mut overrides = Vec::new();
        while let Some(row) = rows.next()? {
            let enabled: Option<i64> = row.get("enabled")?;
            overrides.push(SectionOverride {
                client_id: row.get("client_id")?,
                section_id: row.get("section_id")?,
                patch: OverridePatch {
                    enabled: enabled.map(|value| value != 0),
                    sort_order: row.get("sort_order")?,
                    label: row.get("label")?,
                },
            });
        }
        Ok(overrides)
    }

    fn load_question_overrides(&self, client_id: &str) -> RepoResult<Vec<QuestionOverride>> {
        let mut stmt = self.conn.prepare(
            "SELECT client_id, question_id, enabled, sort_order, label
             FROM question_overrides
             WHERE client_id = ?1
             ORDER BY question_id ASC;",
        )?;
        let mut rows = stmt.query([client_id])?;
        let mut overrides = Vec::new();
        while let Some(row) = rows.next()? {
            let enabled: Option<i64> = row.get("enabled")?;
            overrides.push(QuestionOverride {
                client_id: row.get("client_id")?,
                question_id: row.get("question_id")?,
                patch: OverridePatch {
                    enabled: enabled.map(|value| value != 0),
                    sort_order: row.get("sort_order")?,
                    label: row.get("label")?,
                },
            });
        }
        Ok(overrides)
    }

    fn delete_section_override(&self, client_id: &str, section_id: &str) -> RepoResult<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM section_overrides WHERE client_id = ?1 AND section_id = ?2;",
            params![client_id, section_id],
        )?;
        Ok(deleted > 0)
    }

    fn delete_question_override(&self, client_id: &str, question_id: &str) -> RepoResult<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM question_overrides WHERE client_id = ?1 AND question_id = ?2;",
            params![client_id, question_id],
        )?;
        Ok(deleted > 0)
    }
}
