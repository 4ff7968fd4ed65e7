use std::sync::Arc;

use linkgraph_core::{Did, DidProvider, GraphDocument, OutboundLink, GRAPH_DOCUMENT_ALIAS};

use crate::document::{DocumentStore, WriteOptions};
use crate::error::StoreError;

/// Outbound-link view over one DID's graph document.
///
/// Reads and writes always address the whole sequence; merging is the
/// caller's job.
pub struct GraphStoreClient {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn DidProvider>,
    schema_id: String,
    alias: String,
}

impl GraphStoreClient {
    /// Bind the well-known graph alias of `provider`'s DID to `schema_id`.
    pub fn open(
        store: Arc<dyn DocumentStore>,
        provider: Arc<dyn DidProvider>,
        schema_id: impl Into<String>,
    ) -> Self {
        let client = Self {
            store,
            provider,
            schema_id: schema_id.into(),
            alias: GRAPH_DOCUMENT_ALIAS.to_string(),
        };
        tracing::debug!(
            did = %client.did(),
            store = client.store.store_id(),
            alias = %client.alias,
            "graph store opened"
        );
        client
    }

    pub fn did(&self) -> &Did {
        self.provider.did()
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Current links; empty if the document or its key is absent.
    pub async fn read_links(&self) -> Result<Vec<OutboundLink>, StoreError> {
        let Some(content) = self.store.load(self.did(), &self.alias).await? else {
            return Ok(Vec::new());
        };
        if content.is_null() {
            return Ok(Vec::new());
        }
        let doc: GraphDocument =
            serde_json::from_value(content).map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(doc.outbound_link)
    }

    /// Overwrite the stored sequence with `links`.
    pub async fn write_links(&self, links: Vec<OutboundLink>) -> Result<(), StoreError> {
        let count = links.len();
        let content = serde_json::to_value(GraphDocument {
            outbound_link: links,
        })
        .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let payload =
            serde_json::to_vec(&content).map_err(|e| StoreError::Malformed(e.to_string()))?;
        let authorization = self.provider.create_jws(&payload).await.ok_or_else(|| {
            StoreError::Unauthorized(format!("{} produced no signature", self.did()))
        })?;

        self.store
            .save(
                self.did(),
                &self.alias,
                content,
                WriteOptions {
                    schema_id: self.schema_id.clone(),
                    pin: true,
                    authorization,
                },
            )
            .await?;

        tracing::debug!(did = %self.did(), links = count, "graph document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocumentStore;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use linkgraph_core::Jws;
    use linkgraph_crypto::{sign_jws, KeyPair};
    use serde_json::json;

    struct KeyProvider {
        did: Did,
        keypair: KeyPair,
    }

    impl KeyProvider {
        fn new() -> Self {
            let keypair = KeyPair::generate();
            let did = Did::new(keypair.public_key().to_did_key()).unwrap();
            Self { did, keypair }
        }
    }

    #[async_trait]
    impl DidProvider for KeyProvider {
        fn did(&self) -> &Did {
            &self.did
        }

        async fn create_jws(&self, payload: &[u8]) -> Option<Jws> {
            Some(sign_jws(payload, &self.keypair, self.did.uri()))
        }
    }

    struct SilentProvider(Did);

    #[async_trait]
    impl DidProvider for SilentProvider {
        fn did(&self) -> &Did {
            &self.0
        }

        async fn create_jws(&self, _payload: &[u8]) -> Option<Jws> {
            None
        }
    }

    #[tokio::test]
    async fn test_read_empty_store() {
        let client = GraphStoreClient::open(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(KeyProvider::new()),
            "schema",
        );
        assert!(client.read_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = Arc::new(MemoryDocumentStore::new());
        let provider = Arc::new(KeyProvider::new());
        let client = GraphStoreClient::open(store.clone(), provider.clone(), "schema");

        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let links = vec![
            OutboundLink::follow("0xA", "card", "", ts),
            OutboundLink::follow("0xB", "card", "bob", ts),
        ];
        client.write_links(links.clone()).await.unwrap();

        assert_eq!(client.read_links().await.unwrap(), links);
        let stored = store.get(&provider.did, GRAPH_DOCUMENT_ALIAS).unwrap();
        assert!(stored.pinned);
        assert_eq!(stored.schema_id, "schema");
    }

    #[tokio::test]
    async fn test_document_without_key_is_empty() {
        let store = Arc::new(MemoryDocumentStore::new());
        let provider = Arc::new(KeyProvider::new());
        let content = json!({});
        let payload = serde_json::to_vec(&content).unwrap();
        store
            .save(
                &provider.did,
                GRAPH_DOCUMENT_ALIAS,
                content,
                WriteOptions {
                    schema_id: "schema".into(),
                    pin: true,
                    authorization: sign_jws(&payload, &provider.keypair, provider.did.uri()),
                },
            )
            .await
            .unwrap();

        let client = GraphStoreClient::open(store, provider, "schema");
        assert!(client.read_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_epoch_string_timestamps() {
        let store = Arc::new(MemoryDocumentStore::new());
        let provider = Arc::new(KeyProvider::new());
        let content = json!({"outboundLink": [{
            "target": "0xA",
            "connectionType": "follow",
            "namespace": "card",
            "alias": "",
            "createdAt": "1640995200000"
        }]});
        let payload = serde_json::to_vec(&content).unwrap();
        store
            .save(
                &provider.did,
                GRAPH_DOCUMENT_ALIAS,
                content,
                WriteOptions {
                    schema_id: "schema".into(),
                    pin: true,
                    authorization: sign_jws(&payload, &provider.keypair, provider.did.uri()),
                },
            )
            .await
            .unwrap();

        let client = GraphStoreClient::open(store, provider, "schema");
        let links = client.read_links().await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "0xA");
        assert_eq!(links[0].created_at, Utc.timestamp_opt(1_640_995_200, 0).unwrap());
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let store = Arc::new(MemoryDocumentStore::new());
        let provider = Arc::new(KeyProvider::new());
        let content = json!({"outboundLink": "not-a-list"});
        let payload = serde_json::to_vec(&content).unwrap();
        store
            .save(
                &provider.did,
                GRAPH_DOCUMENT_ALIAS,
                content,
                WriteOptions {
                    schema_id: "schema".into(),
                    pin: true,
                    authorization: sign_jws(&payload, &provider.keypair, provider.did.uri()),
                },
            )
            .await
            .unwrap();

        let client = GraphStoreClient::open(store, provider, "schema");
        assert!(matches!(
            client.read_links().await,
            Err(StoreError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_write_without_signature_fails() {
        let did = Did::new("did:key:z6Mksilent").unwrap();
        let client = GraphStoreClient::open(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(SilentProvider(did)),
            "schema",
        );
        let result = client.write_links(Vec::new()).await;
        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
    }
}
