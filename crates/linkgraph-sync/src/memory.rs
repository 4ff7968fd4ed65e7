//! In-process backend holding the graph in a DashMap.
//!
//! Mirrors the service's observable behavior closely enough to run the
//! graph client end to end without a network: follows are keyed by
//! `(from, to, namespace)`, unfollowing an absent edge succeeds, and alias
//! updates succeed whether or not the edge exists.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::RwLock;
use std::time::Duration;

use crate::api::BackendApi;
use crate::error::SyncError;
use crate::types::{
    IdentitySummary, PopularAccount, SyncOperation, SyncRequest, SyncResponse,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EdgeKey {
    from: String,
    to: String,
    namespace: String,
}

pub struct MemoryBackend {
    edges: DashMap<EdgeKey, String>,
    ens: DashMap<String, String>,
    tags: DashMap<String, BTreeSet<String>>,
    scripted: DashMap<SyncOperation, String>,
    submissions: RwLock<Vec<(SyncOperation, SyncRequest)>>,
    latency: RwLock<Option<Duration>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            edges: DashMap::new(),
            ens: DashMap::new(),
            tags: DashMap::new(),
            scripted: DashMap::new(),
            submissions: RwLock::new(Vec::new()),
            latency: RwLock::new(None),
        }
    }

    /// Answer every future `operation` with `result` instead of applying it.
    pub fn respond_with(&self, operation: SyncOperation, result: impl Into<String>) {
        self.scripted.insert(operation, result.into());
    }

    /// Resume applying `operation` normally.
    pub fn clear_response(&self, operation: SyncOperation) {
        self.scripted.remove(&operation);
    }

    /// Delay every mutation by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().unwrap_or_else(|e| e.into_inner()) = latency;
    }

    pub fn register_ens(&self, address: impl Into<String>, name: impl Into<String>) {
        self.ens.insert(address.into(), name.into());
    }

    /// List `address` under `tag` in the popular-accounts query.
    pub fn tag(&self, tag: impl Into<String>, address: impl Into<String>) {
        self.tags.entry(tag.into()).or_default().insert(address.into());
    }

    /// Every mutation received, in order.
    pub fn submissions(&self) -> Vec<(SyncOperation, SyncRequest)> {
        self.submissions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_following(&self, from: &str, to: &str, namespace: &str) -> bool {
        self.edges.contains_key(&EdgeKey {
            from: from.to_string(),
            to: to.to_string(),
            namespace: namespace.to_string(),
        })
    }

    /// Alias recorded on the edge, if the edge exists.
    pub fn alias(&self, from: &str, to: &str, namespace: &str) -> Option<String> {
        self.edges
            .get(&EdgeKey {
                from: from.to_string(),
                to: to.to_string(),
                namespace: namespace.to_string(),
            })
            .map(|alias| alias.clone())
    }

    fn followers_of(&self, address: &str) -> Vec<String> {
        let set: BTreeSet<String> = self
            .edges
            .iter()
            .filter(|e| e.key().to == address)
            .map(|e| e.key().from.clone())
            .collect();
        set.into_iter().collect()
    }

    fn followings_of(&self, address: &str) -> Vec<String> {
        let set: BTreeSet<String> = self
            .edges
            .iter()
            .filter(|e| e.key().from == address)
            .map(|e| e.key().to.clone())
            .collect();
        set.into_iter().collect()
    }

    fn apply(&self, operation: SyncOperation, request: &SyncRequest) {
        let key = EdgeKey {
            from: request.from_addr.clone(),
            to: request.to_addr.clone(),
            namespace: request.namespace.clone(),
        };
        match operation {
            SyncOperation::Follow => {
                let alias = request.alias.clone();
                self.edges
                    .entry(key)
                    .and_modify(|current| {
                        if let Some(alias) = &alias {
                            *current = alias.clone();
                        }
                    })
                    .or_insert_with(|| alias.clone().unwrap_or_default());
            }
            SyncOperation::Unfollow => {
                self.edges.remove(&key);
            }
            SyncOperation::SetAlias => {
                if let Some(mut current) = self.edges.get_mut(&key) {
                    *current = request.alias.clone().unwrap_or_default();
                }
            }
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendApi for MemoryBackend {
    async fn submit(
        &self,
        operation: SyncOperation,
        request: &SyncRequest,
    ) -> Result<SyncResponse, SyncError> {
        let latency = *self.latency.read().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.submissions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((operation, request.clone()));

        if let Some(result) = self.scripted.get(&operation) {
            return Ok(SyncResponse {
                result: result.clone(),
            });
        }
        if request.signature.is_empty() {
            return Ok(SyncResponse {
                result: "INVALID_SIGNATURE".into(),
            });
        }
        self.apply(operation, request);
        Ok(SyncResponse::success())
    }

    async fn identity(&self, address: &str) -> Result<IdentitySummary, SyncError> {
        let followers = self.followers_of(address);
        let followings = self.followings_of(address);
        Ok(IdentitySummary {
            address: address.to_string(),
            ens: self.ens.get(address).map(|name| name.clone()),
            following_count: followings.len() as u64,
            follower_count: followers.len() as u64,
            followers,
            followings,
        })
    }

    async fn popular(
        &self,
        tag: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PopularAccount>, SyncError> {
        let Some(addresses) = self.tags.get(tag).map(|set| set.clone()) else {
            return Ok(Vec::new());
        };
        let mut accounts: Vec<PopularAccount> = addresses
            .into_iter()
            .map(|address| {
                let followers = self.followers_of(&address);
                PopularAccount {
                    ens: self.ens.get(&address).map(|name| name.clone()),
                    follower_count: followers.len() as u64,
                    is_following: viewer
                        .map(|v| followers.iter().any(|f| f == v))
                        .unwrap_or(false),
                    address,
                }
            })
            .collect();
        accounts.sort_by(|a, b| {
            b.follower_count
                .cmp(&a.follower_count)
                .then_with(|| a.address.cmp(&b.address))
        });
        Ok(accounts)
    }
}
