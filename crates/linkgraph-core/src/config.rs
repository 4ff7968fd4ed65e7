//! Graph client options supplied once at construction.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{Chain, Endpoint, Environment};

/// Options for a graph client. The signer provider is supplied alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphOptions {
    /// Application-defined partition of the social graph. Must be non-empty.
    pub namespace: String,

    /// Deployment environment the endpoints are resolved from.
    #[serde(default)]
    pub environment: Environment,

    /// Chain family of the wallet.
    #[serde(default = "default_chain")]
    pub chain: Chain,

    /// Chain reference (CAIP-2); defaults per chain family.
    #[serde(default)]
    pub chain_ref: Option<String>,

    /// Durability of the wallet ↔ DID binding record.
    #[serde(default)]
    pub binding_mode: BindingMode,

    /// What a failed binding does to the calling operation.
    #[serde(default)]
    pub binding_policy: BindingPolicy,

    /// Time limits around wallet prompts and network calls.
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Per-field endpoint overrides.
    #[serde(default)]
    pub endpoints: EndpointOverrides,
}

/// How the account binding is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    /// Published without waiting for anchoring.
    #[default]
    Unconfirmed,
    /// Published and anchored before returning.
    Anchored,
}

/// Whether binding failures abort the operation or only warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingPolicy {
    #[default]
    Warn,
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Seconds to wait for the wallet to answer a signing prompt.
    #[serde(default = "default_signer_secs")]
    pub signer_secs: u64,
    /// Seconds to wait for a backend or document-store call.
    #[serde(default = "default_network_secs")]
    pub network_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverrides {
    #[serde(default)]
    pub document_network_url: Option<String>,
    #[serde(default)]
    pub backend_api_url: Option<String>,
    #[serde(default)]
    pub graph_schema_id: Option<String>,
}

fn default_chain() -> Chain {
    Chain::Eth
}
fn default_signer_secs() -> u64 {
    120
}
fn default_network_secs() -> u64 {
    30
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            signer_secs: default_signer_secs(),
            network_secs: default_network_secs(),
        }
    }
}

impl Timeouts {
    pub fn signer(&self) -> Duration {
        Duration::from_secs(self.signer_secs)
    }

    pub fn network(&self) -> Duration {
        Duration::from_secs(self.network_secs)
    }
}

impl GraphOptions {
    /// Options for `namespace` with every other field defaulted.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            environment: Environment::default(),
            chain: default_chain(),
            chain_ref: None,
            binding_mode: BindingMode::default(),
            binding_policy: BindingPolicy::default(),
            timeouts: Timeouts::default(),
            endpoints: EndpointOverrides::default(),
        }
    }

    pub fn with_chain(mut self, chain: Chain) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Check construction-time invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        if let Some(chain_ref) = &self.chain_ref {
            let valid = !chain_ref.is_empty()
                && chain_ref.len() <= 32
                && chain_ref
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(ConfigError::InvalidChainRef {
                    chain: self.chain.to_string(),
                    chain_ref: chain_ref.clone(),
                });
            }
        }
        let endpoint = self.endpoint();
        for url in [&endpoint.document_network_url, &endpoint.backend_api_url] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidEndpoint(url.clone()));
            }
        }
        Ok(())
    }

    /// Chain reference in effect.
    pub fn chain_ref(&self) -> String {
        self.chain_ref
            .clone()
            .unwrap_or_else(|| self.chain.default_chain_ref().to_string())
    }

    /// Endpoint for the environment with overrides applied.
    pub fn endpoint(&self) -> Endpoint {
        let mut endpoint = self.environment.endpoint();
        if let Some(url) = &self.endpoints.document_network_url {
            endpoint.document_network_url = url.clone();
        }
        if let Some(url) = &self.endpoints.backend_api_url {
            endpoint.backend_api_url = url.clone();
        }
        if let Some(schema) = &self.endpoints.graph_schema_id {
            endpoint.graph_schema_id = schema.clone();
        }
        endpoint
    }
}
