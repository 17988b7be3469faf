//! Journal entry repository: entries plus tag and mention links.
//!
//! # Responsibility
//! - Provide entry persistence APIs over `entries`/`tags`/`entry_mentions`.
//! - Own entry-plus-links writes with atomic full-set semantics.
//!
//! # Invariants
//! - All entry queries are constrained to `is_deleted=0`.
//! - Entry content and its tag/mention links commit in one transaction;
//!   a failed link write rolls back the entry write with it.
//! - Tag names are normalized to lowercase before persistence.
//!
//! # See also
//! - docs/architecture/mention-links.md

use crate::model::entry::{EntryId, JournalEntry};
use crate::repo::{table_exists, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

const ENTRIES_DEFAULT_LIMIT: u32 = 10;
const ENTRIES_LIMIT_MAX: u32 = 50;

/// Read model for entry list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Stable entry id.
    pub entry_id: EntryId,
    /// Stored content in stable mention form.
    pub content: String,
    /// Create timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
    /// Entry tags, normalized to lowercase, sorted by name.
    pub tags: Vec<String>,
    /// Mentioned entity ids in first-seen parse order.
    pub mentioned_ids: Vec<String>,
}

/// Query options for entry list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    /// Optional single-tag exact match filter.
    pub tag: Option<String>,
    /// Maximum rows to return. Defaults to 10 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for journal entry operations.
pub trait EntryRepository {
    /// Persists one entry row with its full link set in one transaction.
    fn create_entry_with_links(
        &mut self,
        entry: &JournalEntry,
        tags: &[String],
        mentioned_ids: &[String],
    ) -> RepoResult<EntryId>;
    /// Replaces entry content and its full link set in one transaction.
    fn update_entry_with_links(
        &mut self,
        entry_id: EntryId,
        content: &str,
        tags: &[String],
        mentioned_ids: &[String],
    ) -> RepoResult<()>;
    /// Gets one entry with its tag and mention links.
    fn get_entry(&self, entry_id: EntryId) -> RepoResult<Option<EntryRecord>>;
    /// Lists entries using single-tag filter + pagination.
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<EntryRecord>>;
    /// Soft-deletes one entry.
    fn soft_delete_entry(&self, entry_id: EntryId) -> RepoResult<()>;
    /// Returns all known tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed journal entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_entry_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry_with_links(
        &mut self,
        entry: &JournalEntry,
        tags: &[String],
        mentioned_ids: &[String],
    ) -> RepoResult<EntryId> {
        let entry_uuid = entry.uuid.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO entries (uuid, content, is_deleted)
             VALUES (?1, ?2, ?3);",
            params![entry_uuid, entry.content, i64::from(entry.is_deleted)],
        )?;
        replace_links_in_tx(&tx, entry_uuid.as_str(), tags, mentioned_ids)?;
        tx.commit()?;
        Ok(entry.uuid)
    }

    fn update_entry_with_links(
        &mut self,
        entry_id: EntryId,
        content: &str,
        tags: &[String],
        mentioned_ids: &[String],
    ) -> RepoResult<()> {
        let entry_uuid = entry_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE entries
             SET
                content = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![entry_uuid, content],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(entry_id));
        }
        replace_links_in_tx(&tx, entry_uuid.as_str(), tags, mentioned_ids)?;
        tx.commit()?;
        Ok(())
    }

    fn get_entry(&self, entry_id: EntryId) -> RepoResult<Option<EntryRecord>> {
        let uuid = entry_id.to_string();
        let mut stmt = self.conn.prepare(
            "SELECT uuid, content, created_at, updated_at
             FROM entries
             WHERE uuid = ?1
               AND is_deleted = 0;",
        )?;

        let mut rows = stmt.query([uuid.as_str()])?;
        if let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let parsed_id = parse_uuid(&uuid_text)?;
            return Ok(Some(EntryRecord {
                entry_id: parsed_id,
                content: row.get("content")?,
                created_at: row.get("created_at")?,
                updated_at: row.get("updated_at")?,
                tags: load_tags_for_entry(self.conn, &uuid_text)?,
                mentioned_ids: load_mentions_for_entry(self.conn, &uuid_text)?,
            }));
        }

        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<EntryRecord>> {
        let mut sql = String::from(
            "SELECT uuid, content, created_at, updated_at
             FROM entries
             WHERE is_deleted = 0",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM entry_tags et
                    INNER JOIN tags t ON t.id = et.tag_id
                    WHERE et.entry_uuid = entries.uuid
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        sql.push_str(" ORDER BY updated_at DESC, uuid ASC");
        let limit = normalize_entry_limit(query.limit);
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let parsed_id = parse_uuid(&uuid_text)?;
            entries.push(EntryRecord {
                entry_id: parsed_id,
                content: row.get("content")?,
                created_at: row.get("created_at")?,
                updated_at: row.get("updated_at")?,
                tags: load_tags_for_entry(self.conn, &uuid_text)?,
                mentioned_ids: load_mentions_for_entry(self.conn, &uuid_text)?,
            });
        }

        Ok(entries)
    }

    fn soft_delete_entry(&self, entry_id: EntryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE entries
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            [entry_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(entry_id));
        }

        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM tags ORDER BY name COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get("name")?;
            tags.push(value.to_lowercase());
        }
        Ok(tags)
    }
}

/// Normalizes list limit according to the entries contract.
pub fn normalize_entry_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => ENTRIES_DEFAULT_LIMIT,
        Some(value) if value > ENTRIES_LIMIT_MAX => ENTRIES_LIMIT_MAX,
        Some(value) => value,
        None => ENTRIES_DEFAULT_LIMIT,
    }
}

/// Normalizes one tag value for storage.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values for storage.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

fn parse_uuid(value: &str) -> RepoResult<EntryId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in entries.uuid"))
    })
}

fn load_tags_for_entry(conn: &Connection, entry_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM entry_tags et
         INNER JOIN tags t ON t.id = et.tag_id
         WHERE et.entry_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([entry_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

fn load_mentions_for_entry(conn: &Connection, entry_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT entity_id
         FROM entry_mentions
         WHERE entry_uuid = ?1
         ORDER BY position ASC, entity_id ASC;",
    )?;
    let mut rows = stmt.query([entry_uuid])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(value);
    }
    Ok(ids)
}

/// Replaces the full tag/mention link set inside an open transaction.
///
/// Callers own the commit; any failure here rolls the whole write back.
fn replace_links_in_tx(
    tx: &Transaction<'_>,
    entry_uuid: &str,
    tags: &[String],
    mentioned_ids: &[String],
) -> RepoResult<()> {
    tx.execute("DELETE FROM entry_tags WHERE entry_uuid = ?1;", [entry_uuid])?;
    tx.execute(
        "DELETE FROM entry_mentions WHERE entry_uuid = ?1;",
        [entry_uuid],
    )?;

    for tag in tags {
        tx.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        tx.execute(
            "INSERT INTO entry_tags (entry_uuid, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![entry_uuid, tag.as_str()],
        )?;
    }

    for (position, entity_id) in mentioned_ids.iter().enumerate() {
        tx.execute(
            "INSERT OR IGNORE INTO entry_mentions (entry_uuid, entity_id, position)
             VALUES (?1, ?2, ?3);",
            params![entry_uuid, entity_id.as_str(), position as i64],
        )?;
    }

    Ok(())
}

fn ensure_entry_connection_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["entries", "tags", "entry_tags", "entry_mentions"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
