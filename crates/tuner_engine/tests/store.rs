use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tuner_engine::JobStore;

fn init_logging() {
    tuner_logging::initialize_for_tests();
}

#[test]
fn load_on_fresh_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = JobStore::new(dir.path());
    assert_eq!(store.load(), Vec::<u64>::new());
    assert_eq!(store.last_dataset(), None);
}

#[test]
fn append_preserves_call_order() {
    let dir = TempDir::new().unwrap();
    let store = JobStore::new(dir.path());
    store.append(4).unwrap();
    store.append(9).unwrap();
    store.append(2).unwrap();
    assert_eq!(store.load(), vec![4, 9, 2]);
}

#[test]
fn duplicate_append_keeps_first_position() {
    let dir = TempDir::new().unwrap();
    let store = JobStore::new(dir.path());
    store.append(4).unwrap();
    store.append(9).unwrap();
    store.append(4).unwrap();
    assert_eq!(store.load(), vec![4, 9]);
}

#[test]
fn registry_survives_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    JobStore::new(dir.path()).append(7).unwrap();

    // A fresh handle over the same directory sees the same state.
    let reopened = JobStore::new(dir.path());
    assert_eq!(reopened.load(), vec![7]);
}

#[test]
fn malformed_state_reads_as_empty() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let store = JobStore::new(dir.path());
    store.append(4).unwrap();
    fs::write(store.state_path(), "][ not ron at all").unwrap();

    assert_eq!(store.load(), Vec::<u64>::new());
    assert_eq!(store.last_dataset(), None);
}

#[test]
fn last_dataset_is_independent_of_the_registry() {
    let dir = TempDir::new().unwrap();
    let store = JobStore::new(dir.path());
    store.set_last_dataset("ds1").unwrap();
    assert_eq!(store.last_dataset(), Some("ds1".to_string()));
    assert_eq!(store.load(), Vec::<u64>::new());

    store.set_last_dataset("ds2").unwrap();
    assert_eq!(store.last_dataset(), Some("ds2".to_string()));
}

#[test]
fn record_submission_writes_both_fields_at_once() {
    let dir = TempDir::new().unwrap();
    let store = JobStore::new(dir.path());
    store.record_submission(42, "ds1").unwrap();

    let reopened = JobStore::new(dir.path());
    assert_eq!(reopened.load(), vec![42]);
    assert_eq!(reopened.last_dataset(), Some("ds1".to_string()));
}
