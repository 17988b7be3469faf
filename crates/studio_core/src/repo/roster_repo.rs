//! Roster repository: mentionable client/project snapshot.
//!
//! # Responsibility
//! - Persist the locally mirrored roster and load it as plain data for the
//!   mention resolver.
//!
//! # Invariants
//! - `load_roster` order is deterministic (name, then id) so duplicate-name
//!   resolution stays stable across calls.

use crate::model::roster::{EntityKind, RosterEntry};
use crate::repo::{table_exists, RepoError, RepoResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;

/// Repository interface for roster operations.
pub trait RosterRepository {
    /// Inserts or updates one mentionable entity.
    fn upsert_entity(&self, entry: &RosterEntry) -> RepoResult<()>;
    /// Loads the full roster snapshot in deterministic order.
    fn load_roster(&self) -> RepoResult<Vec<RosterEntry>>;
    /// Loads the id-to-current-name map used for display rendering.
    fn entity_names(&self) -> RepoResult<HashMap<String, String>>;
}

/// SQLite-backed roster repository.
pub struct SqliteRosterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRosterRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "roster")? {
            return Err(RepoError::MissingRequiredTable("roster"));
        }
        Ok(Self { conn })
    }
}

impl RosterRepository for SqliteRosterRepository<'_> {
    fn upsert_entity(&self, entry: &RosterEntry) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO roster (id, name, kind)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (id) DO UPDATE SET name = excluded.name, kind = excluded.kind;",
            params![entry.id, entry.name, kind_to_db(entry.kind)],
        )?;
        Ok(())
    }

    fn load_roster(&self) -> RepoResult<Vec<RosterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind
             FROM roster
             ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut roster = Vec::new();
        while let Some(row) = rows.next()? {
            let kind_text: String = row.get("kind")?;
            roster.push(RosterEntry {
                id: row.get("id")?,
                name: row.get("name")?,
                kind: kind_from_db(&kind_text)?,
            });
        }
        Ok(roster)
    }

    fn entity_names(&self) -> RepoResult<HashMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM roster;")?;
        let mut rows = stmt.query([])?;
        let mut names = HashMap::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let name: String = row.get("name")?;
            names.insert(id, name);
        }
        Ok(names)
    }
}

fn kind_to_db(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Client => "client",
        EntityKind::Project => "project",
    }
}

fn kind_from_db(value: &str) -> RepoResult<EntityKind> {
    match value {
        "client" => Ok(EntityKind::Client),
        "project" => Ok(EntityKind::Project),
        other => Err(RepoError::InvalidData(format!(
            "invalid kind value `{other}` in roster.kind"
        ))),
    }
}
