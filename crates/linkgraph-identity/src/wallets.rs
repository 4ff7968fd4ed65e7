//! Wallets backed by locally held keys.

use async_trait::async_trait;
use linkgraph_crypto::{sign, EthKey, KeyPair};
use zeroize::Zeroizing;

use crate::error::SignerError;
use crate::signer::{EthProvider, SolanaWallet};

/// A single-account Ethereum wallet signing with an in-memory secp256k1 key.
pub struct LocalEthWallet {
    key: EthKey,
    address: String,
}

impl LocalEthWallet {
    pub fn new(key: EthKey) -> Self {
        let address = key.address();
        Self { key, address }
    }

    pub fn generate() -> Self {
        Self::new(EthKey::generate())
    }

    /// Load from a hex secret, as stored in key files.
    pub fn from_hex(secret: &str) -> Result<Self, SignerError> {
        EthKey::from_hex(secret)
            .map(Self::new)
            .map_err(|e| SignerError::AuthProvider(e.to_string()))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn secret_hex(&self) -> Zeroizing<String> {
        self.key.secret_hex()
    }
}

#[async_trait]
impl EthProvider for LocalEthWallet {
    async fn accounts(&self) -> Result<Vec<String>, SignerError> {
        Ok(vec![self.address.clone()])
    }

    async fn personal_sign(&self, address: &str, message: &[u8]) -> Result<String, SignerError> {
        if !address.eq_ignore_ascii_case(&self.address) {
            return Err(SignerError::Rejected(format!(
                "unknown account {}",
                address
            )));
        }
        let signature = self
            .key
            .personal_sign(message)
            .map_err(|e| SignerError::Rejected(e.to_string()))?;
        Ok(format!("0x{}", hex::encode(signature)))
    }
}

/// A Solana wallet signing with an in-memory Ed25519 keypair.
pub struct LocalSolanaWallet {
    keypair: KeyPair,
}

impl LocalSolanaWallet {
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    pub fn generate() -> Self {
        Self::new(KeyPair::generate())
    }

    pub fn from_hex(secret: &str) -> Result<Self, SignerError> {
        let trimmed = secret.trim();
        let bytes = Zeroizing::new(
            hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
                .map_err(|e| SignerError::AuthProvider(format!("invalid hex secret: {}", e)))?,
        );
        KeyPair::from_bytes(&bytes)
            .map(Self::new)
            .map_err(|e| SignerError::AuthProvider(e.to_string()))
    }

    pub fn address(&self) -> String {
        self.keypair.public_key().to_bs58()
    }

    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.keypair.secret_bytes()))
    }
}

#[async_trait]
impl SolanaWallet for LocalSolanaWallet {
    fn public_key(&self) -> Option<[u8; 32]> {
        Some(*self.keypair.public_key().as_bytes())
    }

    fn supports_sign_message(&self) -> bool {
        true
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        Ok(sign(message, &self.keypair).to_bytes().to_vec())
    }
}
