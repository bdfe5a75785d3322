//! Store Tests
//!
//! Tests verify:
//! - Lifecycle contract (init exactly once, no use after terminate)
//! - Global lock handout
//! - Concurrent disjoint-key safety (no lost updates)
//! - Overlapping-key serialization (no deadlock, no corrupt values)

use std::sync::Arc;

use shardkv::{Executor, ShardError, Store};

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_init_exactly_once() {
    let store = Store::new();
    assert!(!store.is_initialized());

    store.init().unwrap();
    assert!(store.is_initialized());

    let err = store.init().unwrap_err();
    assert!(matches!(err, ShardError::AlreadyInitialized));
}

#[test]
fn test_terminate_requires_init() {
    let store = Store::new();
    let err = store.terminate().unwrap_err();
    assert!(matches!(err, ShardError::NotInitialized));
}

#[test]
fn test_no_use_after_terminate() {
    let store = Store::new();
    store.init().unwrap();
    store.terminate().unwrap();

    assert!(matches!(
        store.table_shared().unwrap_err(),
        ShardError::NotInitialized
    ));
    assert!(matches!(
        store.table_exclusive().unwrap_err(),
        ShardError::NotInitialized
    ));
}

#[test]
fn test_reinit_after_terminate() {
    let store = Store::new();
    store.init().unwrap();
    store.terminate().unwrap();
    store.init().unwrap();

    assert_eq!(store.table_shared().unwrap().entry_count(), 0);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_disjoint_writes_lose_nothing() {
    const THREADS: usize = 8;
    const KEYS_PER_THREAD: usize = 100;

    let store = Arc::new(Store::new());
    store.init().unwrap();
    let executor = Executor::new(Arc::clone(&store));

    crossbeam::thread::scope(|scope| {
        for t in 0..THREADS {
            let executor = executor.clone();
            scope.spawn(move |_| {
                for i in 0..KEYS_PER_THREAD {
                    let pairs = vec![(format!("t{t}-k{i}"), format!("t{t}-v{i}"))];
                    executor.write(&pairs).unwrap();
                }
            });
        }
    })
    .unwrap();

    let table = store.table_shared().unwrap();
    assert_eq!(table.entry_count(), THREADS * KEYS_PER_THREAD);
    drop(table);

    // Every write survived with its exact value.
    for t in 0..THREADS {
        for i in 0..KEYS_PER_THREAD {
            let mut out = Vec::new();
            let keys = vec![format!("t{t}-k{i}")];
            executor.read(&keys, &mut out).unwrap();
            assert_eq!(
                String::from_utf8(out).unwrap(),
                format!("[(t{t}-k{i},t{t}-v{i})]\n")
            );
        }
    }
}

#[test]
fn test_overlapping_writes_serialize_without_deadlock() {
    const ROUNDS: usize = 500;

    let store = Arc::new(Store::new());
    store.init().unwrap();
    let executor = Executor::new(Arc::clone(&store));

    // Two threads hammer the same key pair in opposite request order; the
    // lock plan's ascending bucket order keeps them deadlock-free.
    crossbeam::thread::scope(|scope| {
        let a = executor.clone();
        scope.spawn(move |_| {
            for _ in 0..ROUNDS {
                a.write(&[
                    ("shared-x".to_string(), "from-a".to_string()),
                    ("shared-y".to_string(), "from-a".to_string()),
                ])
                .unwrap();
            }
        });

        let b = executor.clone();
        scope.spawn(move |_| {
            for _ in 0..ROUNDS {
                b.write(&[
                    ("shared-y".to_string(), "from-b".to_string()),
                    ("shared-x".to_string(), "from-b".to_string()),
                ])
                .unwrap();
            }
        });
    })
    .unwrap();

    // Last writer wins; the value is always one of the two written values,
    // never corrupt or partial.
    for key in ["shared-x", "shared-y"] {
        let mut out = Vec::new();
        executor.read(&[key.to_string()], &mut out).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(
            line == format!("[({key},from-a)]\n") || line == format!("[({key},from-b)]\n"),
            "unexpected read result: {line}"
        );
    }
}

#[test]
fn test_readers_run_concurrently_with_writers() {
    const ROUNDS: usize = 300;

    let store = Arc::new(Store::new());
    store.init().unwrap();
    let executor = Executor::new(Arc::clone(&store));
    executor
        .write(&[("stable".to_string(), "value".to_string())])
        .unwrap();

    crossbeam::thread::scope(|scope| {
        let writer = executor.clone();
        scope.spawn(move |_| {
            for i in 0..ROUNDS {
                writer
                    .write(&[("churn".to_string(), format!("v{i}"))])
                    .unwrap();
            }
        });

        let reader = executor.clone();
        scope.spawn(move |_| {
            for _ in 0..ROUNDS {
                let mut out = Vec::new();
                reader.read(&["stable".to_string()], &mut out).unwrap();
                assert_eq!(String::from_utf8(out).unwrap(), "[(stable,value)]\n");
            }
        });
    })
    .unwrap();
}
