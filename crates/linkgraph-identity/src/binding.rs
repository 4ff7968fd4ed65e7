//! Wallet account ↔ DID binding records.
//!
//! A binding proves that the wallet which authenticated a session controls
//! the session DID: the wallet signs a link message naming the DID and the
//! proof is published to a registry. Registries are append-only; the most
//! recent record for an account wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use linkgraph_core::{AccountId, BindingMode, Chain, Did};
use linkgraph_crypto::{recover_personal_signer, verify, PublicKey, Signature};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::error::BindingError;
use crate::session::Session;
use crate::signer::ChainSigner;

/// The message a wallet signs to link itself to `did`.
pub fn binding_message(did: &Did, timestamp: i64) -> String {
    format!(
        "Link this account to your identity.\n\n{}\nTimestamp: {}",
        did, timestamp
    )
}

/// A wallet signature over [`binding_message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingProof {
    pub account_id: String,
    pub did: String,
    pub message: String,
    pub signature: String,
    pub timestamp: i64,
}

impl BindingProof {
    /// Check that the account named in the proof signed its message.
    pub fn verify(&self) -> Result<(), BindingError> {
        let did = Did::new(self.did.clone())
            .map_err(|e| BindingError::InvalidProof(e.to_string()))?;
        if self.message != binding_message(&did, self.timestamp) {
            return Err(BindingError::InvalidProof(
                "message does not name the bound DID".into(),
            ));
        }
        let account: AccountId = self
            .account_id
            .parse()
            .map_err(|e: linkgraph_core::CoreError| BindingError::InvalidProof(e.to_string()))?;

        match account.chain {
            Chain::Eth => {
                let raw = self.signature.strip_prefix("0x").unwrap_or(&self.signature);
                let bytes = hex::decode(raw)
                    .map_err(|e| BindingError::InvalidProof(format!("signature: {}", e)))?;
                let signer = recover_personal_signer(self.message.as_bytes(), &bytes)
                    .map_err(|e| BindingError::InvalidProof(e.to_string()))?;
                if !signer.eq_ignore_ascii_case(&account.address) {
                    return Err(BindingError::InvalidProof(format!(
                        "signed by {} instead of {}",
                        signer, account.address
                    )));
                }
            }
            Chain::Solana => {
                let public_key = PublicKey::from_bs58(&account.address)
                    .map_err(|e| BindingError::InvalidProof(e.to_string()))?;
                let bytes = bs58::decode(&self.signature)
                    .into_vec()
                    .map_err(|e| BindingError::InvalidProof(format!("signature: {}", e)))?;
                let signature = Signature::from_bytes(&bytes)
                    .map_err(|e| BindingError::InvalidProof(e.to_string()))?;
                verify(self.message.as_bytes(), &signature, &public_key)
                    .map_err(|e| BindingError::InvalidProof(e.to_string()))?;
            }
        }
        Ok(())
    }
}

/// A published binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBinding {
    pub account_id: String,
    pub did: String,
    pub proof: BindingProof,
    pub mode: BindingMode,
    pub created_at: DateTime<Utc>,
}

/// Where binding records live.
#[async_trait]
pub trait BindingRegistry: Send + Sync {
    /// Latest binding published for `account_id`.
    async fn resolve(&self, account_id: &AccountId) -> Result<Option<AccountBinding>, BindingError>;

    async fn publish(
        &self,
        proof: BindingProof,
        mode: BindingMode,
    ) -> Result<AccountBinding, BindingError>;
}

/// In-process append-only registry. Proofs are verified before they are
/// recorded.
pub struct MemoryBindingRegistry {
    records: DashMap<String, Vec<AccountBinding>>,
}

impl MemoryBindingRegistry {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Every record published for `account_id`, oldest first.
    pub fn history(&self, account_id: &AccountId) -> Vec<AccountBinding> {
        self.records
            .get(&account_id.to_string())
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BindingRegistry for MemoryBindingRegistry {
    async fn resolve(&self, account_id: &AccountId) -> Result<Option<AccountBinding>, BindingError> {
        Ok(self
            .records
            .get(&account_id.to_string())
            .and_then(|entry| entry.last().cloned()))
    }

    async fn publish(
        &self,
        proof: BindingProof,
        mode: BindingMode,
    ) -> Result<AccountBinding, BindingError> {
        proof.verify()?;
        let binding = AccountBinding {
            account_id: proof.account_id.clone(),
            did: proof.did.clone(),
            proof,
            mode,
            created_at: Utc::now(),
        };
        self.records
            .entry(binding.account_id.clone())
            .or_default()
            .push(binding.clone());
        Ok(binding)
    }
}

#[derive(Serialize)]
struct PublishRequest<'a> {
    proof: &'a BindingProof,
    mode: BindingMode,
}

/// Registry reached over the document network node's HTTP API.
///
/// - `GET  {base}/api/v0/bindings/{account_id}` → [`AccountBinding`] or 404
/// - `POST {base}/api/v0/bindings` with `{"proof", "mode"}` → [`AccountBinding`]
pub struct HttpBindingRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBindingRegistry {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BindingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BindingError::Registry(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BindingRegistry for HttpBindingRegistry {
    async fn resolve(&self, account_id: &AccountId) -> Result<Option<AccountBinding>, BindingError> {
        let url = format!("{}/api/v0/bindings/{}", self.base_url, account_id);
        let resp = self.client.get(url).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(resp.json().await?)),
            status => Err(BindingError::Registry(format!(
                "resolve {} returned HTTP {}",
                account_id, status
            ))),
        }
    }

    async fn publish(
        &self,
        proof: BindingProof,
        mode: BindingMode,
    ) -> Result<AccountBinding, BindingError> {
        let url = format!("{}/api/v0/bindings", self.base_url);
        let resp = self
            .client
            .post(url)
            .json(&PublishRequest {
                proof: &proof,
                mode,
            })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BindingError::Registry(format!(
                "publish returned HTTP {}: {}",
                status, body
            )));
        }
        Ok(resp.json().await?)
    }
}

/// Publishes the session's binding once per client.
pub struct AccountBinder {
    registry: Arc<dyn BindingRegistry>,
    mode: BindingMode,
    binding: OnceCell<AccountBinding>,
}

impl AccountBinder {
    pub fn new(registry: Arc<dyn BindingRegistry>, mode: BindingMode) -> Self {
        Self {
            registry,
            mode,
            binding: OnceCell::new(),
        }
    }

    pub fn current(&self) -> Option<&AccountBinding> {
        self.binding.get()
    }

    /// Ensure a binding from the session's account to its DID exists,
    /// asking the wallet to sign a link message only when none resolves.
    pub async fn ensure_bound(
        &self,
        session: &Session,
        signer: &ChainSigner,
    ) -> Result<AccountBinding, BindingError> {
        self.binding
            .get_or_try_init(|| self.bind(session, signer))
            .await
            .cloned()
    }

    async fn bind(
        &self,
        session: &Session,
        signer: &ChainSigner,
    ) -> Result<AccountBinding, BindingError> {
        let account_id = &session.identity().auth_id;
        if let Some(existing) = self.registry.resolve(account_id).await? {
            if existing.did == session.did().uri() {
                tracing::debug!(account = %account_id, did = %session.did(), "binding already published");
                return Ok(existing);
            }
        }

        let timestamp = Utc::now().timestamp();
        let message = binding_message(session.did(), timestamp);
        let signature = signer.authenticate(&message).await?;
        let proof = BindingProof {
            account_id: account_id.to_string(),
            did: session.did().to_string(),
            message,
            signature,
            timestamp,
        };
        let binding = self.registry.publish(proof, self.mode).await?;
        tracing::info!(
            account = %account_id,
            did = %session.did(),
            mode = ?self.mode,
            "account binding published"
        );
        Ok(binding)
    }
}
