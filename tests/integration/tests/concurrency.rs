//! Integration test: concurrent mutations for one identity.
//!
//! The mirror update is a read-modify-write of a single document. Clients
//! acting for the same identity serialize through a shared single-flight
//! lock so no update is lost.

use linkgraph_integration_tests::{CountingWallet, FlakyStore, Harness};
use std::collections::BTreeSet;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_concurrent_connects_from_two_clients_keep_both_links() {
    let harness = Harness::new();
    let store = FlakyStore::slow(harness.store.clone(), Duration::from_millis(50));
    let wallet = CountingWallet::new();

    let first = harness.facade_with_store("card", wallet.provider(), store.clone());
    let second = harness.facade_with_store("card", wallet.provider(), store.clone());
    // Authenticate up front so both clients race on the mirror only.
    first.authenticate().await.unwrap();
    second.authenticate().await.unwrap();

    let (a, b) = futures::join!(first.connect("0xA", None), second.connect("0xB", None));
    assert!(a.unwrap().is_synced());
    assert!(b.unwrap().is_synced());

    let targets: BTreeSet<String> = first
        .links()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.target)
        .collect();
    assert_eq!(targets, BTreeSet::from(["0xA".to_string(), "0xB".to_string()]));
}

#[tokio::test(start_paused = true)]
async fn test_many_concurrent_operations_on_one_client() {
    let harness = Harness::new();
    let store = FlakyStore::slow(harness.store.clone(), Duration::from_millis(10));
    let graph = harness.facade_with_store("card", CountingWallet::new().provider(), store);

    let targets: Vec<String> = (0..8).map(|n| format!("0x{:02}", n)).collect();
    let results =
        futures::future::join_all(targets.iter().map(|t| graph.connect(t, None))).await;
    for result in results {
        assert!(result.unwrap().is_synced());
    }

    let links = graph.links().await.unwrap();
    assert_eq!(links.len(), targets.len());
    assert_eq!(harness.flights.len(), 1);
}
