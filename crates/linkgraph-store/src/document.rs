use async_trait::async_trait;
use linkgraph_core::{Did, Jws};
use serde_json::Value;

use crate::error::StoreError;

/// Parameters of a document write.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Schema the content must conform to.
    pub schema_id: String,
    /// Ask the node to pin (locally cache) the written document.
    pub pin: bool,
    /// JWS over the serialized content, signed by the owning DID.
    pub authorization: Jws,
}

/// Get/set contract of the decentralized document network.
///
/// Documents are addressed by owner DID and a well-known alias.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the content under `alias`, `None` if nothing was ever written.
    async fn load(&self, did: &Did, alias: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the content under `alias`.
    async fn save(
        &self,
        did: &Did,
        alias: &str,
        content: Value,
        options: WriteOptions,
    ) -> Result<(), StoreError>;

    /// Short name used in logs.
    fn store_id(&self) -> &str;
}
