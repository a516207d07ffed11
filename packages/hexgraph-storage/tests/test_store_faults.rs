//! Store failure, retry and cancellation behaviour
//!
//! - Range scan failures abort traversals without partial results
//! - Non-atomic stores get verified, retried inserts
//! - Connections are returned when a traversal is abandoned

mod common;

use std::time::Duration;

use common::{insert_all, node_set, FaultyStore, Faults};
use hexgraph_storage::{ErrorKind, HexastoreIndex, InsertPolicy, Triple};

const CHAIN: &[(&str, &str, &str)] = &[
    ("a", "next", "b"),
    ("b", "next", "c"),
    ("c", "next", "d"),
];

#[tokio::test]
async fn test_depth_traversal_fails_fast() {
    let store = FaultyStore::new(Faults {
        scans_before_failure: Some(1),
        ..Faults::default()
    });
    let index = HexastoreIndex::new(store, "g");
    insert_all(&index, CHAIN).await;

    let err = index.traverse_depth(3, "a", "next").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    // First scan succeeded, second failed, nothing after
    assert_eq!(index.store().scans(), 2);
}

#[tokio::test]
async fn test_discovery_traversal_fails_fast() {
    let store = FaultyStore::new(Faults {
        scans_before_failure: Some(2),
        ..Faults::default()
    });
    let index = HexastoreIndex::new(store, "g");
    insert_all(&index, CHAIN).await;

    let err = index
        .traverse_discovery(5, ["a"], "next")
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
    assert_eq!(index.store().scans(), 3);
}

#[tokio::test]
async fn test_depth_zero_does_not_scan() {
    let store = FaultyStore::new(Faults {
        scans_before_failure: Some(0),
        ..Faults::default()
    });
    let index = HexastoreIndex::new(store, "g");
    insert_all(&index, CHAIN).await;

    assert!(index.traverse_depth(0, "a", "next").await.unwrap().is_empty());
    assert_eq!(index.store().scans(), 0);
}

#[tokio::test]
async fn test_shared_node_is_scanned_once() {
    // Diamond: s-a, s-b, a-x, b-x
    let store = FaultyStore::new(Faults::default());
    let index = HexastoreIndex::new(store, "g");
    insert_all(
        &index,
        &[
            ("s", "next", "a"),
            ("s", "next", "b"),
            ("a", "next", "x"),
            ("b", "next", "x"),
        ],
    )
    .await;

    let reached = index.traverse_depth(3, "s", "next").await.unwrap();
    assert_eq!(reached, node_set(&["a", "b", "s", "x"]));
    // level 1: s; level 2: a, b; level 3: s, x
    assert_eq!(index.store().scans(), 5);
}

#[tokio::test]
async fn test_non_atomic_insert_is_retried() {
    let store = FaultyStore::new(Faults {
        non_atomic: true,
        partial_writes: 2,
        ..Faults::default()
    });
    let index = HexastoreIndex::new(store, "g");
    let triple = Triple::new("a", "next", "b");

    index.insert_triple(&triple).await.unwrap();
    assert_eq!(index.store().writes(), 3);
    assert!(index.contains(&triple).await.unwrap());
}

#[tokio::test]
async fn test_non_atomic_insert_gives_up() {
    let store = FaultyStore::new(Faults {
        non_atomic: true,
        partial_writes: usize::MAX,
        ..Faults::default()
    });
    let index =
        HexastoreIndex::new(store, "g").with_insert_policy(InsertPolicy { max_attempts: 4 });

    let err = index.insert("a", "next", "b").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    assert_eq!(index.store().writes(), 4);

    // The caller may retry the whole insert once the store recovers
    let healthy = HexastoreIndex::new(index.store().inner.clone(), "g");
    healthy.insert("a", "next", "b").await.unwrap();
    assert!(healthy
        .contains(&Triple::new("a", "next", "b"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_abandoned_traversal_releases_connection() {
    let store = FaultyStore::new(Faults {
        scan_delay: Some(Duration::from_millis(200)),
        ..Faults::default()
    });
    let index = HexastoreIndex::new(store, "g");
    insert_all(&index, CHAIN).await;
    assert_eq!(index.store().inner.available_connections(), 4);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        index.traverse_depth(3, "a", "next"),
    )
    .await;
    assert!(abandoned.is_err());
    assert_eq!(index.store().inner.available_connections(), 4);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        index.traverse_discovery(3, ["a"], "next"),
    )
    .await;
    assert!(abandoned.is_err());
    assert_eq!(index.store().inner.available_connections(), 4);
}

#[tokio::test]
async fn test_traversal_holds_one_connection() {
    let store = FaultyStore::new(Faults {
        scan_delay: Some(Duration::from_millis(5)),
        ..Faults::default()
    });
    let index = HexastoreIndex::new(store, "g");
    insert_all(&index, CHAIN).await;

    let traversal = index.traverse_depth(4, "a", "next");
    let probe = async {
        tokio::time::sleep(Duration::from_millis(2)).await;
        index.store().inner.available_connections()
    };
    let (reached, available_during) = tokio::join!(traversal, probe);

    assert_eq!(reached.unwrap(), node_set(&["a", "b", "c", "d"]));
    assert_eq!(available_during, 3);
}
