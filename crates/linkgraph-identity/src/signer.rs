//! Chain signer adapters.
//!
//! A [`ChainSigner`] wraps the wallet of one chain family and exposes the two
//! things the session layer needs from it: the active address and a signature
//! over an arbitrary challenge string.

use async_trait::async_trait;
use linkgraph_core::Chain;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::SignerError;

/// An injected EIP-1193 style Ethereum provider.
#[async_trait]
pub trait EthProvider: Send + Sync {
    /// Accounts the wallet exposes; the first one is active.
    async fn accounts(&self) -> Result<Vec<String>, SignerError>;

    /// EIP-191 `personal_sign` of `message` by `address`, returned as 0x-hex.
    async fn personal_sign(&self, address: &str, message: &[u8]) -> Result<String, SignerError>;
}

/// A connected Solana wallet adapter.
#[async_trait]
pub trait SolanaWallet: Send + Sync {
    fn public_key(&self) -> Option<[u8; 32]>;

    fn supports_sign_message(&self) -> bool;

    /// Raw Ed25519 signature over `message`.
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// Wallet handle supplied at construction.
#[derive(Clone)]
pub enum SignerProvider {
    Eth(Arc<dyn EthProvider>),
    Solana(Arc<dyn SolanaWallet>),
}

impl SignerProvider {
    pub fn chain(&self) -> Chain {
        match self {
            SignerProvider::Eth(_) => Chain::Eth,
            SignerProvider::Solana(_) => Chain::Solana,
        }
    }
}

impl std::fmt::Debug for SignerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignerProvider::{}", self.chain())
    }
}

struct EthSigner {
    provider: Arc<dyn EthProvider>,
}

impl EthSigner {
    async fn current_address(&self) -> Result<String, SignerError> {
        let accounts = self.provider.accounts().await?;
        accounts
            .into_iter()
            .next()
            .map(|a| a.to_lowercase())
            .ok_or(SignerError::NoAccount)
    }

    async fn sign(&self, message: &str) -> Result<String, SignerError> {
        let address = self.current_address().await?;
        let signature = self
            .provider
            .personal_sign(&address, message.as_bytes())
            .await?;
        let raw = signature.strip_prefix("0x").unwrap_or(&signature);
        match hex::decode(raw) {
            Ok(bytes) if bytes.len() == 65 => Ok(format!("0x{}", raw.to_lowercase())),
            _ => Err(SignerError::Rejected(format!(
                "wallet returned a malformed signature: {}",
                signature
            ))),
        }
    }
}

struct SolanaSigner {
    wallet: Arc<dyn SolanaWallet>,
    public_key: [u8; 32],
}

impl SolanaSigner {
    fn new(wallet: Arc<dyn SolanaWallet>) -> Result<Self, SignerError> {
        let public_key = wallet.public_key().ok_or_else(|| {
            SignerError::AuthProvider("solana wallet is not connected".into())
        })?;
        if !wallet.supports_sign_message() {
            return Err(SignerError::AuthProvider(
                "solana wallet does not support message signing".into(),
            ));
        }
        Ok(Self { wallet, public_key })
    }

    fn current_address(&self) -> String {
        bs58::encode(self.public_key).into_string()
    }

    async fn sign(&self, message: &str) -> Result<String, SignerError> {
        let signature = self.wallet.sign_message(message.as_bytes()).await?;
        if signature.len() != 64 {
            return Err(SignerError::Rejected(format!(
                "wallet returned a {}-byte signature",
                signature.len()
            )));
        }
        Ok(bs58::encode(signature).into_string())
    }
}

enum Adapter {
    Eth(EthSigner),
    Solana(SolanaSigner),
}

/// Signs challenges with the configured wallet, one adapter per chain family.
pub struct ChainSigner {
    adapter: Adapter,
    timeout: Duration,
}

impl ChainSigner {
    /// Validate `provider` against `chain` and build the matching adapter.
    pub fn new(
        chain: Chain,
        provider: Option<SignerProvider>,
        timeout: Duration,
    ) -> Result<Self, SignerError> {
        let provider = provider.ok_or(SignerError::EmptyProvider(chain))?;
        if provider.chain() != chain {
            return Err(SignerError::AuthProvider(format!(
                "configured for {} but a {} provider was supplied",
                chain,
                provider.chain()
            )));
        }
        let adapter = match provider {
            SignerProvider::Eth(provider) => Adapter::Eth(EthSigner { provider }),
            SignerProvider::Solana(wallet) => Adapter::Solana(SolanaSigner::new(wallet)?),
        };
        Ok(Self { adapter, timeout })
    }

    pub fn chain(&self) -> Chain {
        match self.adapter {
            Adapter::Eth(_) => Chain::Eth,
            Adapter::Solana(_) => Chain::Solana,
        }
    }

    /// Address of the active wallet account.
    pub async fn current_address(&self) -> Result<String, SignerError> {
        match &self.adapter {
            Adapter::Eth(signer) => self.bounded(signer.current_address()).await,
            Adapter::Solana(signer) => Ok(signer.current_address()),
        }
    }

    /// Ask the wallet to sign `challenge`, bounded by the signer timeout.
    pub async fn authenticate(&self, challenge: &str) -> Result<String, SignerError> {
        let signature = match &self.adapter {
            Adapter::Eth(signer) => self.bounded(signer.sign(challenge)).await?,
            Adapter::Solana(signer) => self.bounded(signer.sign(challenge)).await?,
        };
        tracing::debug!(chain = %self.chain(), "wallet signed challenge");
        Ok(signature)
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, SignerError>>,
    ) -> Result<T, SignerError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| SignerError::Timeout(self.timeout))?
    }
}
