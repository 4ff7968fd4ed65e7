//! HTTP client for a document network node.
//!
//! - `GET  {base}/api/v0/documents/{did}/{alias}` → `{"content": ...}` or 404
//! - `PUT  {base}/api/v0/documents/{did}/{alias}` with `{"content", "schema", "pin"}`
//!   and `Authorization: Bearer <compact JWS>`

use async_trait::async_trait;
use linkgraph_core::Did;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::document::{DocumentStore, WriteOptions};
use crate::error::StoreError;

#[derive(Serialize)]
struct SaveRequest<'a> {
    content: &'a Value,
    schema: &'a str,
    pin: bool,
}

#[derive(Deserialize)]
struct DocumentResponse {
    content: Value,
}

pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    /// Create a client for the node at `base_url`; every call is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn document_url(&self, did: &Did, alias: &str) -> String {
        format!("{}/api/v0/documents/{}/{}", self.base_url, did, alias)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn load(&self, did: &Did, alias: &str) -> Result<Option<Value>, StoreError> {
        let resp = self.client.get(self.document_url(did, alias)).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: DocumentResponse = resp
                    .json()
                    .await
                    .map_err(|e| StoreError::Malformed(e.to_string()))?;
                Ok(Some(body.content))
            }
            status => Err(StoreError::Transport(format!(
                "load {} returned HTTP {}",
                alias, status
            ))),
        }
    }

    async fn save(
        &self,
        did: &Did,
        alias: &str,
        content: Value,
        options: WriteOptions,
    ) -> Result<(), StoreError> {
        let body = SaveRequest {
            content: &content,
            schema: &options.schema_id,
            pin: options.pin,
        };
        let resp = self
            .client
            .put(self.document_url(did, alias))
            .bearer_auth(options.authorization.to_compact())
            .json(&body)
            .send()
            .await?;
        match resp.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized(
                format!("node rejected write to {}", alias),
            )),
            status => Err(StoreError::Transport(format!(
                "save {} returned HTTP {}",
                alias, status
            ))),
        }
    }

    fn store_id(&self) -> &str {
        &self.base_url
    }
}
