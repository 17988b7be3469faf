use rusqlite::params;
use studio_core::db::open_db_in_memory;
use studio_core::{
    EntityKind, JournalService, JournalServiceError, RosterEntry, RosterRepository, Segment,
    SqliteEntryRepository, SqliteRosterRepository,
};
use uuid::Uuid;

fn roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("c_acme", "Acme", EntityKind::Client),
        RosterEntry::new("c_acme_corp", "Acme Corp", EntityKind::Client),
        RosterEntry::new("p_launch", "Launch Plan", EntityKind::Project),
    ]
}

#[test]
fn capture_persists_stable_form_and_links() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);

    let record = service
        .capture("met @Acme Corp about #Launch #launch", &roster())
        .unwrap();

    assert_eq!(record.content, "met @[c_acme_corp] about #Launch #launch");
    assert_eq!(record.mentioned_ids, vec!["c_acme_corp".to_string()]);
    assert_eq!(record.tags, vec!["launch".to_string()]);
}

#[test]
fn display_substitutes_current_entity_names() {
    let mut conn = open_db_in_memory().unwrap();

    let entry_id = {
        let roster_repo = SqliteRosterRepository::try_new(&conn).unwrap();
        for entry in roster() {
            roster_repo.upsert_entity(&entry).unwrap();
        }
        let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
        let mut service = JournalService::new(repo);
        service
            .capture("sync with @Acme Corp on @Launch Plan", &roster())
            .unwrap()
            .entry_id
    };

    // Rename after capture: history must show the new name.
    conn.execute(
        "UPDATE roster SET name = ?1 WHERE id = ?2;",
        params!["Acme Corporation", "c_acme_corp"],
    )
    .unwrap();

    let names = {
        let roster_repo = SqliteRosterRepository::try_new(&conn).unwrap();
        roster_repo.entity_names().unwrap()
    };
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let service = JournalService::new(repo);

    let displayed = service.display(entry_id, &names).unwrap();
    assert_eq!(displayed, "sync with @Acme Corporation on @Launch Plan");

    let segments = service.display_segments(entry_id, &names).unwrap();
    assert!(segments.iter().any(|segment| matches!(
        segment,
        Segment::Mention { id, name } if id == "c_acme_corp" && name == "Acme Corporation"
    )));
}

#[test]
fn display_keeps_literal_token_for_deleted_referent() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);

    let record = service.capture("ping @Acme today", &roster()).unwrap();

    // Empty name map simulates a deleted referent.
    let displayed = service
        .display(record.entry_id, &std::collections::HashMap::new())
        .unwrap();
    assert_eq!(displayed, "ping @[c_acme] today");
}

#[test]
fn revise_replaces_content_and_recomputes_links() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);

    let created = service.capture("draft for @Acme #draft", &roster()).unwrap();
    let revised = service
        .revise(created.entry_id, "final for @Launch Plan #final", &roster())
        .unwrap();

    assert_eq!(revised.content, "final for @[p_launch] #final");
    assert_eq!(revised.mentioned_ids, vec!["p_launch".to_string()]);
    assert_eq!(revised.tags, vec!["final".to_string()]);
}

#[test]
fn list_filters_by_tag_and_applies_limit_contract() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);

    let tagged = service.capture("note one #campaign", &[]).unwrap();
    service.capture("note two #other", &[]).unwrap();

    let filtered = service.list(Some("CAMPAIGN".to_string()), Some(10), 0).unwrap();
    assert_eq!(filtered.items.len(), 1);
    assert_eq!(filtered.items[0].entry_id, tagged.entry_id);

    let defaulted = service.list(None, None, 0).unwrap();
    assert_eq!(defaulted.applied_limit, 10);

    let capped = service.list(None, Some(500), 0).unwrap();
    assert_eq!(capped.applied_limit, 50);
}

#[test]
fn soft_deleted_entries_disappear_from_reads() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);

    let record = service.capture("ephemeral #gone", &[]).unwrap();
    service.delete(record.entry_id).unwrap();

    assert!(service.get_entry(record.entry_id).unwrap().is_none());
    let listed = service.list(None, Some(10), 0).unwrap();
    assert!(listed.items.is_empty());
}

#[test]
fn failed_link_write_rolls_back_entry_row() {
    let mut conn = open_db_in_memory().unwrap();
    // Reject mention link inserts mid-transaction to simulate a write
    // failure between the entry row and its links.
    conn.execute_batch(
        "CREATE TRIGGER reject_mention_links BEFORE INSERT ON entry_mentions
         BEGIN SELECT RAISE(ABORT, 'mention link rejected'); END;",
    )
    .unwrap();

    let err = {
        let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
        let mut service = JournalService::new(repo);
        service.capture("kickoff with @Acme", &roster()).unwrap_err()
    };
    assert!(matches!(err, JournalServiceError::Repo(_)));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0, "failed capture must not leave an entry row");
}

#[test]
fn failed_link_write_keeps_previous_entry_state_on_revise() {
    let mut conn = open_db_in_memory().unwrap();
    let entry_id = {
        let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
        let mut service = JournalService::new(repo);
        service
            .capture("draft for @Acme #draft", &roster())
            .unwrap()
            .entry_id
    };

    conn.execute_batch(
        "CREATE TRIGGER reject_mention_links BEFORE INSERT ON entry_mentions
         BEGIN SELECT RAISE(ABORT, 'mention link rejected'); END;",
    )
    .unwrap();

    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);
    let err = service
        .revise(entry_id, "final for @Launch Plan #final", &roster())
        .unwrap_err();
    assert!(matches!(err, JournalServiceError::Repo(_)));

    // The whole revision rolled back: old content, old links.
    let record = service.get_entry(entry_id).unwrap().unwrap();
    assert_eq!(record.content, "draft for @[c_acme] #draft");
    assert_eq!(record.mentioned_ids, vec!["c_acme".to_string()]);
    assert_eq!(record.tags, vec!["draft".to_string()]);
}

#[test]
fn operations_on_missing_entry_report_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);

    let missing = Uuid::new_v4();
    let err = service.revise(missing, "text", &[]).unwrap_err();
    assert!(matches!(err, JournalServiceError::EntryNotFound(id) if id == missing));
}

#[test]
fn reparse_of_persisted_content_yields_same_links() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&mut conn).unwrap();
    let mut service = JournalService::new(repo);

    let record = service
        .capture("met @Acme Corp re #launch", &roster())
        .unwrap();
    let rescan = studio_core::parse_mentions(&record.content, &roster());
    assert_eq!(rescan.mentioned_ids, record.mentioned_ids);
    assert_eq!(rescan.tags, record.tags);
}
