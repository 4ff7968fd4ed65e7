//! GraphQL-over-HTTPS backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::api::BackendApi;
use crate::error::SyncError;
use crate::types::{IdentitySummary, PopularAccount, SyncOperation, SyncRequest, SyncResponse};

const FOLLOW: &str = r#"mutation follow($fromAddr: String!, $toAddr: String!, $alias: String, $namespace: String, $network: Network, $signature: String!) {
  follow(fromAddr: $fromAddr, toAddr: $toAddr, alias: $alias, namespace: $namespace, network: $network, signature: $signature) {
    result
  }
}"#;

const UNFOLLOW: &str = r#"mutation unfollow($fromAddr: String!, $toAddr: String!, $namespace: String, $network: Network, $signature: String!) {
  unfollow(fromAddr: $fromAddr, toAddr: $toAddr, namespace: $namespace, network: $network, signature: $signature) {
    result
  }
}"#;

const SET_ALIAS: &str = r#"mutation setAlias($fromAddr: String!, $toAddr: String!, $alias: String!, $namespace: String, $network: Network, $signature: String!) {
  setAlias(fromAddr: $fromAddr, toAddr: $toAddr, alias: $alias, namespace: $namespace, network: $network, signature: $signature) {
    result
  }
}"#;

const IDENTITY: &str = r#"query identity($address: String!) {
  identity(address: $address) {
    address
    ens
    followingCount
    followerCount
    followers { list { address } }
    followings { list { address } }
  }
}"#;

const POPULAR: &str = r#"query popular($tags: [TagCategory!]!, $fromAddr: String) {
  popular(tags: { list: $tags }, fromAddr: $fromAddr) {
    list {
      address
      ens
      followerCount
      isFollowing
    }
  }
}"#;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct AddressList {
    #[serde(default)]
    list: Vec<AddressEntry>,
}

#[derive(Deserialize)]
struct AddressEntry {
    address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityNode {
    address: String,
    ens: Option<String>,
    #[serde(default)]
    following_count: u64,
    #[serde(default)]
    follower_count: u64,
    followers: Option<AddressList>,
    followings: Option<AddressList>,
}

#[derive(Deserialize)]
struct PopularNode {
    #[serde(default)]
    list: Vec<PopularAccount>,
}

/// Backend reached at a single GraphQL endpoint.
pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST a GraphQL document and decode `data.<field>`.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<T, SyncError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Transport(format!(
                "{} returned HTTP {}",
                field, status
            )));
        }
        let body: GraphQlResponse = resp.json().await?;
        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(SyncError::Transport(messages.join("; ")));
        }
        let node = body
            .data
            .and_then(|mut data| data.get_mut(field).map(Value::take))
            .filter(|node| !node.is_null())
            .ok_or_else(|| SyncError::Transport(format!("response has no data.{}", field)))?;
        serde_json::from_value(node)
            .map_err(|e| SyncError::Transport(format!("malformed {} response: {}", field, e)))
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn submit(
        &self,
        operation: SyncOperation,
        request: &SyncRequest,
    ) -> Result<SyncResponse, SyncError> {
        let query = match operation {
            SyncOperation::Follow => FOLLOW,
            SyncOperation::Unfollow => UNFOLLOW,
            SyncOperation::SetAlias => SET_ALIAS,
        };
        let mut variables = json!({
            "fromAddr": request.from_addr,
            "toAddr": request.to_addr,
            "namespace": request.namespace,
            "network": request.network,
            "signature": request.signature,
        });
        if operation != SyncOperation::Unfollow {
            variables["alias"] = json!(request.alias.clone().unwrap_or_default());
        }
        self.execute(query, variables, operation.field()).await
    }

    async fn identity(&self, address: &str) -> Result<IdentitySummary, SyncError> {
        let node: IdentityNode = self
            .execute(IDENTITY, json!({ "address": address }), "identity")
            .await?;
        let addresses =
            |list: Option<AddressList>| -> Vec<String> {
                list.map(|l| l.list.into_iter().map(|e| e.address).collect())
                    .unwrap_or_default()
            };
        Ok(IdentitySummary {
            address: node.address,
            ens: node.ens.filter(|name| !name.is_empty()),
            following_count: node.following_count,
            follower_count: node.follower_count,
            followers: addresses(node.followers),
            followings: addresses(node.followings),
        })
    }

    async fn popular(
        &self,
        tag: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PopularAccount>, SyncError> {
        let node: PopularNode = self
            .execute(
                POPULAR,
                json!({ "tags": [tag], "fromAddr": viewer }),
                "popular",
            )
            .await?;
        Ok(node.list)
    }
}
