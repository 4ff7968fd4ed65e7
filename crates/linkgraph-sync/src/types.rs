use serde::{Deserialize, Serialize};
use std::fmt;

/// Result string the backend returns for an accepted mutation.
pub const SUCCESS: &str = "SUCCESS";

/// Graph mutations the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncOperation {
    Follow,
    Unfollow,
    SetAlias,
}

impl SyncOperation {
    /// GraphQL field name of the mutation.
    pub fn field(&self) -> &'static str {
        match self {
            SyncOperation::Follow => "follow",
            SyncOperation::Unfollow => "unfollow",
            SyncOperation::SetAlias => "setAlias",
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Arguments of a graph mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub from_addr: String,
    pub to_addr: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Compact JWS over `{timestamp, targetAddress}`.
    pub signature: String,
    /// Network tag of the sender's chain (`ETH`, `SOLANA`).
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub result: String,
}

impl SyncResponse {
    pub fn success() -> Self {
        Self {
            result: SUCCESS.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == SUCCESS
    }
}

/// Follow counts and edges of one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySummary {
    pub address: String,
    pub ens: Option<String>,
    pub following_count: u64,
    pub follower_count: u64,
    pub followers: Vec<String>,
    pub followings: Vec<String>,
}

/// An entry of the popular-accounts listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularAccount {
    pub address: String,
    pub ens: Option<String>,
    pub follower_count: u64,
    pub is_following: bool,
}
