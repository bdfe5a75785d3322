//! Backup Tests
//!
//! Tests verify:
//! - Exported files are complete, well-formed dumps
//! - The admission bound and shutdown barrier
//! - Snapshot consistency under concurrent writes

use std::fs;
use std::sync::Arc;

use shardkv::{BackupCoordinator, Executor, ShardError, Store};

fn setup() -> (Arc<Store>, Executor, Arc<BackupCoordinator>) {
    let store = Arc::new(Store::new());
    store.init().unwrap();
    let executor = Executor::new(Arc::clone(&store));
    (store, executor, Arc::new(BackupCoordinator::new(1)))
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_writes_show_shaped_dump() {
    let (store, executor, backups) = setup();
    executor
        .write(&[
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ])
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job-1.bck");
    backups.spawn_export(&store, path.clone()).unwrap();
    backups.wait_for_all();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<&str> = content.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, vec!["(a, 1)", "(b, 2)"]);
}

#[test]
fn test_export_of_empty_table() {
    let (store, _executor, backups) = setup();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job-1.bck");
    backups.spawn_export(&store, path.clone()).unwrap();
    backups.wait_for_all();

    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_export_requires_initialized_store() {
    let store = Store::new();
    let backups = Arc::new(BackupCoordinator::new(1));

    let dir = tempfile::tempdir().unwrap();
    let err = backups
        .spawn_export(&store, dir.path().join("x-1.bck"))
        .unwrap_err();

    assert!(matches!(err, ShardError::NotInitialized));
    // The admission slot was given back.
    assert_eq!(backups.in_flight(), 0);
}

// =============================================================================
// Admission / Barrier Tests
// =============================================================================

#[test]
fn test_wait_for_all_drains_every_export() {
    let (store, executor, _) = setup();
    let backups = Arc::new(BackupCoordinator::new(3));
    executor
        .write(&[("k".to_string(), "v".to_string())])
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    for i in 1..=5 {
        backups
            .spawn_export(&store, dir.path().join(format!("job-{i}.bck")))
            .unwrap();
    }
    backups.wait_for_all();

    assert_eq!(backups.in_flight(), 0);
    for i in 1..=5 {
        let content = fs::read_to_string(dir.path().join(format!("job-{i}.bck"))).unwrap();
        assert_eq!(content, "(k, v)\n");
    }
}

#[test]
fn test_admission_bound_never_exceeded() {
    let (store, _executor, _) = setup();
    let backups = Arc::new(BackupCoordinator::new(2));

    let dir = tempfile::tempdir().unwrap();
    for i in 1..=6 {
        backups
            .spawn_export(&store, dir.path().join(format!("job-{i}.bck")))
            .unwrap();
        assert!(backups.in_flight() <= 2);
    }
    backups.wait_for_all();
}

// =============================================================================
// Consistency Tests
// =============================================================================

#[test]
fn test_snapshot_is_consistent_under_concurrent_writes() {
    const KEYS: usize = 100;

    let (store, executor, backups) = setup();
    for i in 0..KEYS {
        executor
            .write(&[(format!("k{i:03}"), "old".to_string())])
            .unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job-1.bck");

    crossbeam::thread::scope(|scope| {
        let writer = executor.clone();
        scope.spawn(move |_| {
            for i in 0..KEYS {
                writer
                    .write(&[(format!("k{i:03}"), "new".to_string())])
                    .unwrap();
            }
        });

        backups.spawn_export(&store, path.clone()).unwrap();
    })
    .unwrap();
    backups.wait_for_all();

    // The update stream only overwrites values, so the dump always has the
    // full key set, and every value is a complete pre- or post-write value.
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), KEYS);
    for line in lines {
        assert!(
            line.ends_with(", old)") || line.ends_with(", new)"),
            "torn value in dump: {line}"
        );
    }
}
