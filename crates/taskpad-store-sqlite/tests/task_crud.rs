//! CRUD behavior of the SQLite task store through its public API.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use taskpad_core::TaskId;
use taskpad_store_sqlite::SqliteStore;

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("open in-memory store")
}

#[test]
fn insert_assigns_defaults_and_returns_full_record() {
    let store = store();
    let task = store.insert_task("Buy milk").expect("insert");

    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
    assert!(task.id.as_i64() > 0);

    let listed = store.fetch_tasks().expect("list");
    assert_eq!(listed, vec![task]);
}

#[test]
fn ids_are_pairwise_distinct_and_never_reused() {
    let store = store();
    let a = store.insert_task("a").expect("insert a");
    let b = store.insert_task("b").expect("insert b");
    assert_ne!(a.id, b.id);

    // Deleting the row with the highest id must not recycle it.
    assert!(store.remove_task(b.id).expect("delete b"));
    let c = store.insert_task("c").expect("insert c");
    assert!(c.id > b.id, "id {} was reused after delete of {}", c.id, b.id);
}

#[test]
fn listing_preserves_insertion_order() {
    let store = store();
    let titles = ["first", "second", "third"];
    for title in titles {
        store.insert_task(title).expect("insert");
    }

    let listed = store.fetch_tasks().expect("list");
    let got: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(got, titles);
}

#[test]
fn replace_overwrites_the_mutable_field_group() {
    let store = store();
    let task = store.insert_task("Buy milk").expect("insert");

    let updated = store
        .replace_task(task.id, "Buy milk", true)
        .expect("replace")
        .expect("row exists");
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.title, "Buy milk");
    assert!(updated.completed);
    assert_eq!(updated.created_at, task.created_at);

    let listed = store.fetch_tasks().expect("list");
    assert_eq!(listed, vec![updated]);
}

#[test]
fn replace_unknown_id_returns_none_and_changes_nothing() {
    let store = store();
    store.insert_task("a").expect("insert");

    let missing = store
        .replace_task(TaskId(999), "ghost", true)
        .expect("replace");
    assert!(missing.is_none());
    assert_eq!(store.fetch_tasks().expect("list").len(), 1);
}

#[test]
fn remove_unknown_id_reports_false() {
    let store = store();
    assert!(!store.remove_task(TaskId(999)).expect("delete"));
}

#[test]
fn latest_follows_creation_order() {
    let store = store();
    assert!(store.latest_task().expect("latest").is_none());

    let a = store.insert_task("A").expect("insert A");
    let b = store.insert_task("B").expect("insert B");

    let latest = store.latest_task().expect("latest").expect("some task");
    assert_eq!(latest.id, b.id);

    assert!(store.remove_task(b.id).expect("delete B"));
    let latest = store.latest_task().expect("latest").expect("some task");
    assert_eq!(latest.id, a.id);
}

#[test]
fn create_a_create_b_latest_b_delete_a_leaves_only_b() {
    let store = store();
    let a = store.insert_task("A").expect("create A");
    let b = store.insert_task("B").expect("create B");

    let latest = store.latest_task().expect("latest").expect("some task");
    assert_eq!(latest.title, "B");

    assert!(store.remove_task(a.id).expect("delete A"));
    let listed = store.fetch_tasks().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "B");
    assert_eq!(listed[0].id, b.id);
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("taskpad.db");

    let created = {
        let store = SqliteStore::open(&path).expect("open file store");
        store.insert_task("survives restart").expect("insert")
    };

    let store = SqliteStore::open(&path).expect("reopen file store");
    let listed = store.fetch_tasks().expect("list");
    assert_eq!(listed, vec![created]);
}
