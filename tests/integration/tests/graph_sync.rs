//! Integration test: backend-first writes and mirror reconciliation.
//!
//! Every scenario drives the public graph client against the in-memory
//! backend, document store and binding registry.

use linkgraph::{GraphError, MirrorStatus};
use linkgraph_integration_tests::{at, CountingWallet, FlakyStore, Harness};
use linkgraph_store::StoreError;
use linkgraph_sync::{SyncError, SyncOperation};

// =========================================================================
// Connect
// =========================================================================

#[tokio::test]
async fn test_repeated_connect_keeps_one_entry() {
    let harness = Harness::new();
    let graph = harness.facade("card", CountingWallet::new().provider());

    for _ in 0..4 {
        let report = graph.connect("0xA", None).await.unwrap();
        assert!(report.is_synced());
    }

    let links = graph.links().await.unwrap();
    let matching: Vec<_> = links.iter().filter(|l| l.matches("0xA", "card")).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].created_at, harness.last_time());
    assert_eq!(matching[0].created_at, at(3));
}

#[tokio::test]
async fn test_reconnect_without_alias_preserves_alias() {
    let harness = Harness::new();
    let graph = harness.facade("card", CountingWallet::new().provider());

    graph.connect("0xTarget", Some("friend")).await.unwrap();
    graph.connect("0xTarget", None).await.unwrap();

    let links = graph.links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, "0xTarget");
    assert_eq!(links[0].alias, "friend");
    assert_eq!(links[0].created_at, at(1));
}

#[tokio::test]
async fn test_mirror_document_shape() {
    let harness = Harness::new();
    let graph = harness.facade("card", CountingWallet::new().provider());
    graph.connect("0xA", Some("alice")).await.unwrap();

    let did = graph.identity().await.unwrap().did;
    let stored = harness
        .store
        .get(&did, linkgraph_core::GRAPH_DOCUMENT_ALIAS)
        .unwrap();
    let entry = &stored.content["outboundLink"][0];
    assert_eq!(entry["target"], "0xA");
    assert_eq!(entry["connectionType"], "follow");
    assert_eq!(entry["namespace"], "card");
    assert_eq!(entry["alias"], "alice");
    assert_eq!(entry["createdAt"], "1700000000000");
    assert!(stored.pinned);
    assert_eq!(stored.schema_id, graph.endpoint().graph_schema_id);
}

// =========================================================================
// Disconnect
// =========================================================================

#[tokio::test]
async fn test_connect_a_connect_b_disconnect_a() {
    let harness = Harness::new();
    let graph = harness.facade("card", CountingWallet::new().provider());

    graph.connect("0xA", None).await.unwrap();
    graph.connect("0xB", None).await.unwrap();
    graph.disconnect("0xA").await.unwrap();

    let links = graph.links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, "0xB");
}

#[tokio::test]
async fn test_disconnect_leaves_other_namespaces() {
    let harness = Harness::new();
    let wallet = CountingWallet::new();
    let card = harness.facade("card", wallet.provider());
    let other = harness.facade("other", wallet.provider());

    card.connect("0xA", None).await.unwrap();
    other.connect("0xA", None).await.unwrap();
    card.disconnect("0xA").await.unwrap();

    let links = other.links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].namespace, "other");
    assert!(harness.backend.is_following(wallet.address(), "0xA", "other"));
    assert!(!harness.backend.is_following(wallet.address(), "0xA", "card"));
}

// =========================================================================
// Alias
// =========================================================================

#[tokio::test]
async fn test_set_alias_updates_link() {
    let harness = Harness::new();
    let graph = harness.facade("card", CountingWallet::new().provider());

    graph.connect("0xA", None).await.unwrap();
    let report = graph.set_alias("0xA", "pal").await.unwrap();

    assert!(report.is_synced());
    assert_eq!(graph.links().await.unwrap()[0].alias, "pal");
}

#[tokio::test]
async fn test_set_alias_without_connect_is_target_not_found() {
    let harness = Harness::new();
    let wallet = CountingWallet::new();
    let graph = harness.facade("card", wallet.provider());

    let report = graph.set_alias("0xA", "x").await.unwrap();

    // The backend accepted the change before the mirror lookup failed.
    let submissions = harness.backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, SyncOperation::SetAlias);
    assert!(matches!(
        report.mirror,
        MirrorStatus::Lagging(StoreError::TargetNotFound { .. })
    ));
    match report.into_strict() {
        Err(e @ GraphError::Store(StoreError::TargetNotFound { .. })) => {
            assert_eq!(e.stage(), "store")
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert!(graph.links().await.unwrap().is_empty());
}

// =========================================================================
// Failure isolation
// =========================================================================

#[tokio::test]
async fn test_backend_rejection_leaves_mirror_unchanged() {
    let harness = Harness::new();
    let graph = harness.facade("card", CountingWallet::new().provider());
    graph.connect("0xA", None).await.unwrap();

    harness
        .backend
        .respond_with(SyncOperation::Follow, "INVALID_SIGNATURE");
    let err = graph.connect("0xB", None).await.unwrap_err();

    assert_eq!(err.stage(), "backend");
    assert!(matches!(
        err,
        GraphError::Backend(SyncError::Rejected { operation: SyncOperation::Follow, ref result })
            if result == "INVALID_SIGNATURE"
    ));
    let links = graph.links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, "0xA");
}

#[tokio::test]
async fn test_mirror_outage_is_reported_and_later_writes_resume() {
    let harness = Harness::new();
    let store = FlakyStore::new(harness.store.clone());
    let wallet = CountingWallet::new();
    let graph = harness.facade_with_store("card", wallet.provider(), store.clone());

    graph.connect("0xA", None).await.unwrap();
    store.set_offline(true);
    let report = graph.connect("0xB", None).await.unwrap();

    // Backend write stands even though the mirror missed it.
    assert!(matches!(
        report.mirror_error(),
        Some(StoreError::Transport(_))
    ));
    assert!(harness.backend.is_following(wallet.address(), "0xB", "card"));

    store.set_offline(false);
    assert_eq!(graph.links().await.unwrap().len(), 1);
    let report = graph.connect("0xC", None).await.unwrap();
    assert!(report.is_synced());

    let targets: Vec<String> = graph
        .links()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.target)
        .collect();
    assert_eq!(targets, vec!["0xA", "0xC"]);
}
