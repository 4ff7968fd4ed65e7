use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use linkgraph_core::{Did, Jws};
use linkgraph_crypto::{verify_jws, PublicKey};
use serde_json::Value;

use crate::document::{DocumentStore, WriteOptions};
use crate::error::StoreError;

/// A stored document revision.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub content: Value,
    pub schema_id: String,
    pub pinned: bool,
    /// Incremented on every write, starting at 1.
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

/// In-process document store keyed by `(did, alias)`.
///
/// Writes from `did:key` owners must carry a JWS over the content that
/// verifies against the key embedded in the DID. Other DID methods are
/// accepted as-is since they cannot be resolved locally.
pub struct MemoryDocumentStore {
    documents: DashMap<(String, String), StoredDocument>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Inspect a stored revision.
    pub fn get(&self, did: &Did, alias: &str) -> Option<StoredDocument> {
        self.documents
            .get(&(did.uri().to_string(), alias.to_string()))
            .map(|entry| entry.clone())
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn authorize(did: &Did, content: &Value, authorization: &Jws) -> Result<(), StoreError> {
        if did.method() != "key" {
            return Ok(());
        }
        let public_key = PublicKey::from_did_key(did.uri())
            .map_err(|e| StoreError::Unauthorized(e.to_string()))?;
        let payload = verify_jws(authorization, &public_key)
            .map_err(|e| StoreError::Unauthorized(e.to_string()))?;
        let signed: Value = serde_json::from_slice(&payload)
            .map_err(|e| StoreError::Unauthorized(format!("payload is not JSON: {}", e)))?;
        if &signed != content {
            return Err(StoreError::Unauthorized(
                "signed payload does not match content".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self, did: &Did, alias: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.get(did, alias).map(|doc| doc.content))
    }

    async fn save(
        &self,
        did: &Did,
        alias: &str,
        content: Value,
        options: WriteOptions,
    ) -> Result<(), StoreError> {
        Self::authorize(did, &content, &options.authorization)?;

        let key = (did.uri().to_string(), alias.to_string());
        let now = Utc::now();
        self.documents
            .entry(key)
            .and_modify(|doc| {
                doc.content = content.clone();
                doc.schema_id = options.schema_id.clone();
                doc.pinned = options.pin;
                doc.version += 1;
                doc.updated_at = now;
            })
            .or_insert_with(|| StoredDocument {
                content: content.clone(),
                schema_id: options.schema_id.clone(),
                pinned: options.pin,
                version: 1,
                updated_at: now,
            });

        tracing::debug!(did = %did, alias, "document saved");
        Ok(())
    }

    fn store_id(&self) -> &str {
        "memory"
    }
}
