//! Reload behaviour of the file-backed entry store

use chrono::{Duration, TimeZone, Utc};
use quill_core::storage::{ENTRIES_BACKUP_KEY, ENTRIES_KEY};
use quill_core::{
    validate_markup, EntryStore, FileStore, KeyValueStore, ManualClock, SequentialIds,
};
use tempfile::TempDir;

fn open(dir: &TempDir, clock: &ManualClock) -> EntryStore {
    EntryStore::open(FileStore::new(dir.path()))
        .with_id_generator(Box::new(SequentialIds::new("entry")))
        .with_clock(clock.clone())
}

#[test]
fn test_state_survives_reopen_after_every_mutation() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 10, 7, 0, 0).unwrap());

    let mut store = open(&temp_dir, &clock);
    let first = store
        .add("Hello", "This is my very first entry today.", vec!["life".into()])
        .unwrap();
    assert_eq!(open(&temp_dir, &clock).entries(), store.entries());

    clock.advance(Duration::hours(1));
    store
        .add("Second", "<p>Another entry with enough text.</p>", vec![])
        .unwrap();
    store
        .update(&first.id, "Hello v2", "Updated body text here with enough length.", vec![])
        .unwrap()
        .unwrap();
    assert_eq!(open(&temp_dir, &clock).entries(), store.entries());

    let outcome = store
        .import_json(
            r#"[{"id": "imported-1", "title": "From backup", "content": "restored body",
                 "tags": ["backup"], "createdAt": "2023-12-31T23:00:00Z"}]"#,
        )
        .unwrap();
    assert_eq!(outcome.added_count, 1);

    store.delete("entry-2").unwrap();

    let reopened = open(&temp_dir, &clock);
    let titles: Vec<_> = reopened.entries().iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["From backup", "Hello v2"]);
    assert_eq!(reopened.get("entry-1").unwrap().created_at, first.created_at);
    assert!(reopened.get("entry-1").unwrap().last_edited_at.is_some());
}

#[test]
fn test_corrupt_file_opens_empty_and_recovers() {
    let temp_dir = TempDir::new().unwrap();
    let mut backend = FileStore::new(temp_dir.path());
    backend.set(ENTRIES_KEY, "[{\"id\": ").unwrap();

    let clock = ManualClock::new(Utc::now());
    let mut store = open(&temp_dir, &clock);
    assert!(store.is_empty());

    let title = "Fresh start";
    let content = "<p>Content written after the corrupt file.</p>";
    assert!(validate_markup(title, content, 20).valid);
    store.add(title, content, vec![]).unwrap();

    assert_eq!(open(&temp_dir, &clock).len(), 1);
    assert_eq!(
        backend.get(ENTRIES_BACKUP_KEY).unwrap().as_deref(),
        Some("[{\"id\": ")
    );
    assert!(temp_dir.path().join("entries.corrupt.backup.json").exists());
}
