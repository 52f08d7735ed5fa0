//! Tests for the SQLite group store.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::NamedTempFile;

use secret_santa::{
    ExchangeService, GroupId, GroupPolicy, GroupStatus, GroupStore, NewGroup, SantaError,
    SqliteGroupStore, StoreError, StoreErrorKind,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SqliteGroupStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteGroupStore::open(db_path, 1000).expect("Failed to open store");
    (db_file, store)
}

fn service_for(store: SqliteGroupStore) -> ExchangeService<SqliteGroupStore, ChaCha8Rng> {
    ExchangeService::new(
        Arc::new(store),
        ChaCha8Rng::seed_from_u64(12),
        GroupPolicy::default(),
    )
}

fn details(title: &str, day: u32, names: &[&str]) -> NewGroup {
    NewGroup::new(
        title.to_string(),
        40.0,
        NaiveDate::from_ymd_opt(2026, 12, day).expect("Invalid date"),
        "Wrap it yourself".to_string(),
        names.iter().map(|n| n.to_string()).collect(),
    )
}

#[test]
fn test_create_and_read_preserves_order() {
    let (_db, store) = setup_test_db();
    let service = service_for(store);
    let names = ["Zoe", "Ana", "Max", "Ben", "Lia"];
    let id = service
        .create_group(details("Friends", 20, &names))
        .expect("Create failed");

    let group = service.group(&id).expect("Read failed");
    let stored: Vec<_> = group.participants().iter().map(|p| p.name().as_str()).collect();
    assert_eq!(stored, names.to_vec());
    assert_eq!(group.rules(), "Wrap it yourself");
    assert_eq!(*group.event_date(), NaiveDate::from_ymd_opt(2026, 12, 20).unwrap());
    assert_eq!(group.status(), GroupStatus::Draft);
}

#[test]
fn test_read_unknown_group() {
    let (_db, store) = setup_test_db();
    let missing = GroupId::generate();
    assert_eq!(
        store.read(&missing),
        Err(SantaError::GroupNotFound { group_id: missing })
    );
}

#[test]
fn test_assignment_survives_reopen() {
    let (db, store) = setup_test_db();
    let service = service_for(store);
    let id = service
        .create_group(details("Team", 18, &["Ana", "Ben", "Cai", "Dee"]))
        .expect("Create failed");
    service.generate_assignment(&id).expect("Draw failed");
    let drawn = service.group(&id).expect("Read failed");

    let db_path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = SqliteGroupStore::open(db_path, 1000).expect("Reopen failed");
    let group = reopened.read(&id).expect("Read failed");

    assert_eq!(group, drawn);
    assert!(*group.assignment_generated());
    for participant in group.participants() {
        let recipient = participant.assigned_recipient_id().expect("Unassigned participant");
        assert_ne!(recipient, *participant.id());
    }
}

#[test]
fn test_mutation_error_rolls_back() {
    let (_db, store) = setup_test_db();
    let service = service_for(store);
    let id = service
        .create_group(details("Team", 18, &["Ana", "Ben", "Cai"]))
        .expect("Create failed");
    let before = service.group(&id).expect("Read failed");

    let result: Result<(), SantaError> = service.store().with_transaction(&id, |group| {
        secret_santa::ParticipantRegistry::new(group, GroupPolicy::default())
            .add_participant("Dee".into())?;
        Err(StoreError::new(StoreErrorKind::Query, "Simulated failure after a write").into())
    });
    assert!(result.expect_err("Mutation should fail").is_persistence());

    assert_eq!(service.group(&id).expect("Read failed"), before);
}

#[test]
fn test_reveal_latch_persists() {
    let (_db, store) = setup_test_db();
    let service = service_for(store);
    let id = service
        .create_group(details("Team", 18, &["Ana", "Ben", "Cai"]))
        .expect("Create failed");
    service.generate_assignment(&id).expect("Draw failed");

    let group = service.group(&id).expect("Read failed");
    let ana = *group.participants()[0].id();
    let first = service.reveal(&id, &ana).expect("Reveal failed");
    let second = service.reveal(&id, &ana).expect("Reveal failed");

    assert_eq!(first, second);
    assert!(service.is_revealed(&id, &ana).expect("Query failed"));
    assert_eq!(service.group(&id).expect("Read failed").revealed_count(), 1);
}

#[test]
fn test_locked_after_draw() {
    let (_db, store) = setup_test_db();
    let service = service_for(store);
    let id = service
        .create_group(details("Team", 18, &["Ana", "Ben", "Cai"]))
        .expect("Create failed");
    service.generate_assignment(&id).expect("Draw failed");

    let result = service.add_participant(&id, "Dee");
    assert_eq!(result, Err(SantaError::GroupLocked { group_id: id }));
    assert_eq!(service.group(&id).expect("Read failed").participants().len(), 3);
}

#[test]
fn test_list_groups_latest_event_first() {
    let (_db, store) = setup_test_db();
    let service = service_for(store);
    for (title, day) in [("Middle", 12), ("Last", 31), ("First", 1)] {
        service
            .create_group(details(title, day, &["Ana", "Ben"]))
            .expect("Create failed");
    }

    let titles: Vec<_> = service
        .list_groups()
        .expect("List failed")
        .iter()
        .map(|s| s.title().clone())
        .collect();
    assert_eq!(titles, vec!["Last", "Middle", "First"]);
}

#[test]
fn test_delete_removes_participants() {
    let (_db, store) = setup_test_db();
    let service = service_for(store);
    let keep = service
        .create_group(details("Keep", 5, &["Ana", "Ben"]))
        .expect("Create failed");
    let gone = service
        .create_group(details("Gone", 6, &["Cai", "Dee"]))
        .expect("Create failed");

    service.delete_group(&gone).expect("Delete failed");
    assert!(service.group(&gone).unwrap_err().is_not_found());
    assert!(service.delete_group(&gone).unwrap_err().is_not_found());

    let remaining = service.list_groups().expect("List failed");
    assert_eq!(remaining.len(), 1);
    assert_eq!(*remaining[0].id(), keep);
    assert_eq!(*remaining[0].participant_count(), 2);
}

#[test]
fn test_open_bad_path_fails() {
    let result = SqliteGroupStore::open("/nonexistent/dir/santa.db".to_string(), 100);
    assert!(result.expect_err("Open should fail").is_persistence());
}

#[test]
fn test_concurrent_draws_serialize() {
    const WRITERS: u64 = 6;
    let (db, store) = setup_test_db();
    let path = db.path().to_str().expect("Invalid path").to_string();
    let id = service_for(store)
        .create_group(details("Race", 12, &["Ana", "Ben", "Cai", "Dee", "Eli"]))
        .expect("Create failed");

    // One store and service per thread, as separate processes would have.
    let services: Vec<_> = (0..WRITERS)
        .map(|seed| {
            let store = SqliteGroupStore::open(path.clone(), 10_000).expect("Failed to open store");
            ExchangeService::new(
                Arc::new(store),
                ChaCha8Rng::seed_from_u64(seed),
                GroupPolicy::default(),
            )
        })
        .collect();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = services
            .iter()
            .map(|service| scope.spawn(move || service.generate_assignment(&id)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("Writer panicked"))
            .collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == SantaError::AlreadyGenerated { group_id: id })
    );

    let group = services[0].group(&id).expect("Read failed");
    let start = group.participant_ids()[0];
    let mut current = start;
    for step in 1..=group.participants().len() {
        current = group
            .participant(&current)
            .and_then(|p| *p.assigned_recipient_id())
            .expect("Participant without recipient");
        assert_eq!(current == start, step == group.participants().len());
    }
}

#[test]
fn test_concurrent_reveals_agree() {
    const READERS: usize = 4;
    let (db, store) = setup_test_db();
    let path = db.path().to_str().expect("Invalid path").to_string();
    let service = service_for(store);
    let id = service
        .create_group(details("Latch", 14, &["Ana", "Ben", "Cai"]))
        .expect("Create failed");
    service.generate_assignment(&id).expect("Draw failed");
    let giver = service.group(&id).expect("Read failed").participant_ids()[1];

    let services: Vec<_> = (0..READERS)
        .map(|_| {
            service_for(SqliteGroupStore::open(path.clone(), 10_000).expect("Failed to open store"))
        })
        .collect();

    let names: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = services
            .iter()
            .map(|service| scope.spawn(move || service.reveal(&id, &giver)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("Reader panicked").expect("Reveal failed"))
            .collect()
    });

    assert!(names.iter().all(|name| *name == names[0]));
    assert!(service.is_revealed(&id, &giver).expect("Query failed"));
    assert_eq!(*service.summary(&id).expect("Summary failed").revealed_count(), 1);
}
