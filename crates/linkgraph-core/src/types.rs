use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Alias under which the outbound-link document lives in a user's document set.
pub const GRAPH_DOCUMENT_ALIAS: &str = "outboundLinks";

/// Blockchain family a wallet authenticates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Eth,
    Solana,
}

impl Chain {
    /// CAIP-2 namespace of the chain family.
    pub fn caip_namespace(&self) -> &'static str {
        match self {
            Chain::Eth => "eip155",
            Chain::Solana => "solana",
        }
    }

    /// Chain reference used when the caller does not supply one.
    pub fn default_chain_ref(&self) -> &'static str {
        match self {
            Chain::Eth => "1",
            Chain::Solana => "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
        }
    }

    /// Network tag the backend expects alongside requests.
    pub fn network_tag(&self) -> &'static str {
        match self {
            Chain::Eth => "ETH",
            Chain::Solana => "SOLANA",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network_tag())
    }
}

impl FromStr for Chain {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eth" | "ethereum" | "eip155" => Ok(Chain::Eth),
            "sol" | "solana" => Ok(Chain::Solana),
            other => Err(CoreError::UnsupportedChain(other.to_string())),
        }
    }
}

/// Deployment environment. Unknown names resolve to production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

impl Environment {
    /// Parse an environment name; anything unrecognised is production.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "staging" | "stg" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            other => {
                tracing::debug!(environment = other, "unknown environment, using production");
                Environment::Production
            }
        }
    }

    /// Endpoints for this environment.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Environment::Production => Endpoint {
                document_network_url: "https://ceramic.cybertino.io".into(),
                backend_api_url: "https://api.cybertino.io/connect/".into(),
                graph_schema_id: "kjzl6cwe1jw145ztuw5pbs5hgw5oiyjiqbhzimpqzqcx7b6oq1z1ujktlfyntdc"
                    .into(),
            },
            Environment::Staging => Endpoint {
                document_network_url: "https://ceramic.stg.cybertino.io".into(),
                backend_api_url: "https://api.stg.cybertino.io/connect/".into(),
                graph_schema_id: "kjzl6cwe1jw147ahz6gu5w3hvjvkvmrzfyt3ewszmkijvasc4kjjlqxrbzxjcqs"
                    .into(),
            },
        }
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Environment::from_name(&name)
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Staging => write!(f, "staging"),
        }
    }
}

/// Per-environment service locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Base URL of the decentralized document network.
    pub document_network_url: String,
    /// URL of the authoritative backend API.
    pub backend_api_url: String,
    /// Schema the graph document is bound to.
    pub graph_schema_id: String,
}

/// A decentralized identifier, e.g. `did:key:z6Mk...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Did(String);

impl Did {
    /// Create a DID from a full URI, validating `did:<method>:<identifier>`.
    pub fn new(uri: impl Into<String>) -> Result<Self, CoreError> {
        let uri = uri.into();
        let parts: Vec<&str> = uri.splitn(3, ':').collect();
        if parts.len() < 3 || parts[0] != "did" || parts[1].is_empty() || parts[2].is_empty() {
            return Err(CoreError::InvalidDid(format!(
                "DID must have format 'did:<method>:<identifier>', got: {}",
                uri
            )));
        }
        Ok(Self(uri))
    }

    /// Get the full DID URI.
    pub fn uri(&self) -> &str {
        &self.0
    }

    /// Extract the method (`key`, `3`, `pkh`, ...).
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Extract the method-specific identifier.
    pub fn identifier(&self) -> &str {
        self.0.splitn(3, ':').nth(2).unwrap_or_default()
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CAIP-10 account identifier: `<namespace>:<reference>:<address>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId {
    pub chain: Chain,
    pub chain_ref: String,
    pub address: String,
}

impl AccountId {
    pub fn new(chain: Chain, chain_ref: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            chain,
            chain_ref: chain_ref.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.chain.caip_namespace(),
            self.chain_ref,
            self.address
        )
    }
}

impl FromStr for AccountId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, ':').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(CoreError::InvalidAccountId(s.to_string()));
        }
        let chain = parts[0]
            .parse::<Chain>()
            .map_err(|_| CoreError::InvalidAccountId(s.to_string()))?;
        Ok(Self::new(chain, parts[1], parts[2]))
    }
}

/// The authenticated wallet and the DID derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub wallet_address: String,
    pub chain: Chain,
    pub chain_ref: String,
    pub did: Did,
    pub auth_id: AccountId,
}

impl Identity {
    pub fn new(wallet_address: String, chain: Chain, chain_ref: String, did: Did) -> Self {
        let auth_id = AccountId::new(chain, chain_ref.clone(), wallet_address.clone());
        Self {
            wallet_address,
            chain,
            chain_ref,
            did,
            auth_id,
        }
    }
}

/// Kind of relationship an outbound link records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    Follow,
}

/// A directed follow record from the authenticated identity to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundLink {
    pub target: String,
    #[serde(default)]
    pub connection_type: ConnectionType,
    pub namespace: String,
    #[serde(default)]
    pub alias: String,
    #[serde(with = "epoch_millis")]
    pub created_at: DateTime<Utc>,
}

impl OutboundLink {
    /// New follow link.
    pub fn follow(
        target: impl Into<String>,
        namespace: impl Into<String>,
        alias: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target: target.into(),
            connection_type: ConnectionType::Follow,
            namespace: namespace.into(),
            alias: alias.into(),
            created_at,
        }
    }

    /// Whether this link is keyed by `(target, namespace)`.
    pub fn matches(&self, target: &str, namespace: &str) -> bool {
        self.target == target && self.namespace == namespace
    }
}

/// `createdAt` is stored as a millisecond-epoch string. RFC 3339 strings and
/// bare integers are accepted on read.
mod epoch_millis {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.timestamp_millis().to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let millis = match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => ms,
            Raw::Text(text) => match text.parse::<i64>() {
                Ok(ms) => ms,
                Err(_) => {
                    return DateTime::parse_from_rfc3339(&text)
                        .map(|ts| ts.with_timezone(&Utc))
                        .map_err(|e| D::Error::custom(format!("invalid createdAt {:?}: {}", text, e)))
                }
            },
        };
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("createdAt out of range: {}", millis)))
    }
}

/// Stored shape of the mirror document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(rename = "outboundLink", default)]
    pub outbound_link: Vec<OutboundLink>,
}
