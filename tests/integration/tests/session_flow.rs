//! Integration test: wallet authentication and account binding through the
//! graph client.

use linkgraph::{LocalSolanaWallet, SessionState, SignerProvider};
use linkgraph_integration_tests::{CountingWallet, Harness};
use std::sync::Arc;

// =========================================================================
// Idempotent authentication
// =========================================================================

#[tokio::test]
async fn test_one_prompt_for_many_operations() {
    let harness = Harness::new();
    let wallet = CountingWallet::new();
    let graph = harness.facade("card", wallet.provider());

    graph.connect("0xA", None).await.unwrap();
    graph.connect("0xB", None).await.unwrap();
    graph.disconnect("0xA").await.unwrap();

    // One prompt for the session challenge, one for the binding message.
    assert_eq!(wallet.prompts(), 2);
    assert_eq!(graph.session_state(), SessionState::DidAuthenticated);
}

#[tokio::test]
async fn test_concurrent_first_calls_share_the_session() {
    let harness = Harness::new();
    let wallet = CountingWallet::new();
    let graph = harness.facade("card", wallet.provider());

    let (a, b) = futures::join!(graph.authenticate(), graph.authenticate());
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(wallet.prompts(), 1);
}

#[tokio::test]
async fn test_same_wallet_derives_same_did_across_clients() {
    let harness = Harness::new();
    let wallet = CountingWallet::new();

    let first = harness.facade("card", wallet.provider()).identity().await.unwrap();
    let second = harness.facade("other", wallet.provider()).identity().await.unwrap();

    assert_eq!(first.did, second.did);
    assert_eq!(first.wallet_address, wallet.address());
    assert_eq!(
        first.auth_id.to_string(),
        format!("eip155:1:{}", wallet.address())
    );
}

// =========================================================================
// Account binding
// =========================================================================

#[tokio::test]
async fn test_binding_published_once_per_account() {
    let harness = Harness::new();
    let wallet = CountingWallet::new();

    let first = harness.facade("card", wallet.provider());
    first.connect("0xA", None).await.unwrap();
    let identity = first.identity().await.unwrap();

    // A second client for the same wallet finds the existing binding.
    let second = harness.facade("card", wallet.provider());
    second.connect("0xB", None).await.unwrap();

    let history = harness.registry.history(&identity.auth_id);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].did, identity.did.uri());
    assert!(history[0].proof.verify().is_ok());
    assert_eq!(second.binding(), first.binding());
}

#[tokio::test]
async fn test_solana_wallet_end_to_end() {
    let harness = Harness::new();
    let graph = linkgraph::GraphFacade::builder(
        linkgraph::GraphOptions::new("card").with_chain(linkgraph::Chain::Solana),
    )
    .signer(SignerProvider::Solana(Arc::new(LocalSolanaWallet::generate())))
    .document_store(harness.store.clone())
    .binding_registry(harness.registry.clone())
    .backend(harness.backend.clone())
    .build()
    .unwrap();

    let report = graph.connect("0xA", Some("pal")).await.unwrap();
    assert!(report.is_synced());

    let identity = graph.identity().await.unwrap();
    assert!(harness
        .backend
        .is_following(&identity.wallet_address, "0xA", "card"));
    assert_eq!(harness.registry.history(&identity.auth_id).len(), 1);
    assert_eq!(graph.links().await.unwrap()[0].alias, "pal");
}
