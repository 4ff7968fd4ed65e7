//! Integration test: the graph client against real HTTP endpoints.
//!
//! A single axum node serves documents, bindings and the GraphQL backend.
//! The client is built without injected collaborators so every request
//! goes through the default HTTP implementations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use linkgraph::{GraphFacade, GraphOptions, LocalEthWallet, SignerProvider};
use linkgraph_core::AccountId;
use linkgraph_identity::{AccountBinding, BindingProof, BindingRegistry, MemoryBindingRegistry};
use linkgraph_sync::{BackendApi, MemoryBackend, SyncOperation, SyncRequest};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct Node {
    docs: Arc<Mutex<HashMap<String, Value>>>,
    registry: Arc<MemoryBindingRegistry>,
    backend: Arc<MemoryBackend>,
}

async fn get_document(
    State(node): State<Node>,
    Path((did, alias)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let docs = node.docs.lock().unwrap();
    docs.get(&format!("{}/{}", did, alias))
        .map(|content| Json(json!({ "content": content })))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn put_document(
    State(node): State<Node>,
    Path((did, alias)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> StatusCode {
    node.docs
        .lock()
        .unwrap()
        .insert(format!("{}/{}", did, alias), body["content"].clone());
    StatusCode::NO_CONTENT
}

async fn resolve_binding(
    State(node): State<Node>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountBinding>, StatusCode> {
    let account_id: AccountId = account_id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    node.registry
        .resolve(&account_id)
        .await
        .ok()
        .flatten()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn publish_binding(
    State(node): State<Node>,
    Json(body): Json<Value>,
) -> Result<Json<AccountBinding>, StatusCode> {
    let proof: BindingProof =
        serde_json::from_value(body["proof"].clone()).map_err(|_| StatusCode::BAD_REQUEST)?;
    let mode = serde_json::from_value(body["mode"].clone()).map_err(|_| StatusCode::BAD_REQUEST)?;
    node.registry
        .publish(proof, mode)
        .await
        .map(Json)
        .map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)
}

async fn graphql(State(node): State<Node>, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();
    let operation = if query.starts_with("mutation follow") {
        SyncOperation::Follow
    } else if query.starts_with("mutation unfollow") {
        SyncOperation::Unfollow
    } else if query.starts_with("mutation setAlias") {
        SyncOperation::SetAlias
    } else {
        return Json(json!({ "data": null, "errors": [{ "message": "unsupported" }] }));
    };
    let request: SyncRequest = match serde_json::from_value(body["variables"].clone()) {
        Ok(request) => request,
        Err(e) => return Json(json!({ "data": null, "errors": [{ "message": e.to_string() }] })),
    };
    let response = node.backend.submit(operation, &request).await.unwrap();
    Json(json!({ "data": { (operation.field()): { "result": response.result } } }))
}

async fn spawn_node() -> (String, Node) {
    let node = Node {
        docs: Arc::new(Mutex::new(HashMap::new())),
        registry: Arc::new(MemoryBindingRegistry::new()),
        backend: Arc::new(MemoryBackend::new()),
    };
    let app = Router::new()
        .route(
            "/api/v0/documents/{did}/{alias}",
            get(get_document).put(put_document),
        )
        .route("/api/v0/bindings/{account_id}", get(resolve_binding))
        .route("/api/v0/bindings", post(publish_binding))
        .route("/graphql", post(graphql))
        .with_state(node.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), node)
}

fn http_graph(base: &str, wallet: Arc<LocalEthWallet>) -> GraphFacade {
    let mut options = GraphOptions::new("card");
    options.endpoints.document_network_url = Some(base.to_string());
    options.endpoints.backend_api_url = Some(format!("{}/graphql", base));
    GraphFacade::builder(options)
        .signer(SignerProvider::Eth(wallet))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_follow_unfollow_over_http() {
    let (base, node) = spawn_node().await;
    let wallet = Arc::new(LocalEthWallet::generate());
    let address = wallet.address().to_string();
    let graph = http_graph(&base, wallet);

    assert!(graph.connect("0xA", Some("alice")).await.unwrap().is_synced());
    assert!(graph.connect("0xB", None).await.unwrap().is_synced());
    assert!(graph.disconnect("0xA").await.unwrap().is_synced());

    assert!(node.backend.is_following(&address, "0xB", "card"));
    assert!(!node.backend.is_following(&address, "0xA", "card"));

    let links = graph.links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, "0xB");

    let identity = graph.identity().await.unwrap();
    assert_eq!(node.registry.history(&identity.auth_id).len(), 1);
    assert!(graph.binding().is_some());
}

#[tokio::test]
async fn test_alias_over_http() {
    let (base, node) = spawn_node().await;
    let wallet = Arc::new(LocalEthWallet::generate());
    let address = wallet.address().to_string();
    let graph = http_graph(&base, wallet);

    graph.connect("0xA", None).await.unwrap();
    let report = graph.set_alias("0xA", "pal").await.unwrap();

    assert!(report.is_synced());
    assert_eq!(node.backend.alias(&address, "0xA", "card").as_deref(), Some("pal"));
    assert_eq!(graph.links().await.unwrap()[0].alias, "pal");
}

#[tokio::test]
async fn test_rejected_signature_surfaces_over_http() {
    let (base, node) = spawn_node().await;
    node.backend
        .respond_with(SyncOperation::Follow, "INVALID_SIGNATURE");
    let graph = http_graph(&base, Arc::new(LocalEthWallet::generate()));

    let err = graph.connect("0xA", None).await.unwrap_err();
    assert_eq!(err.stage(), "backend");
    assert!(graph.links().await.unwrap().is_empty());
}
