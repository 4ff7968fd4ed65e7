use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Multicodec prefix of an Ed25519 public key (varint of 0xed).
const ED25519_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Ed25519 key pair for signing operations.
/// Private key material is zeroized on drop by ed25519-dalek.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Create a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Create a key pair from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(bytes);
        let kp = Self::from_seed(&seed);
        seed.zeroize();
        Ok(kp)
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Raw private key bytes. Prefer the signing helpers.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Ed25519 public key for verification operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Create from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_arr: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        let verifying_key = VerifyingKey::from_bytes(&bytes_arr)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid public key: {}", e)))?;
        Ok(Self { verifying_key })
    }

    /// Get the raw bytes (32 bytes).
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.verifying_key.as_bytes()
    }

    /// Encode as base58 (the Solana address form).
    pub fn to_bs58(&self) -> String {
        bs58::encode(self.as_bytes()).into_string()
    }

    /// Decode from base58.
    pub fn from_bs58(bs58_str: &str) -> Result<Self, CryptoError> {
        let bytes = bs58::decode(bs58_str)
            .into_vec()
            .map_err(|e| CryptoError::InvalidInput(format!("invalid base58: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// `did:key` URI for this key: `did:key:z<base58btc(0xed01 || key)>`.
    pub fn to_did_key(&self) -> String {
        let mut bytes = Vec::with_capacity(34);
        bytes.extend_from_slice(&ED25519_MULTICODEC);
        bytes.extend_from_slice(self.as_bytes());
        format!("did:key:z{}", bs58::encode(bytes).into_string())
    }

    /// Parse a `did:key` URI carrying an Ed25519 key.
    pub fn from_did_key(did: &str) -> Result<Self, CryptoError> {
        let encoded = did
            .strip_prefix("did:key:z")
            .ok_or_else(|| CryptoError::InvalidDidKey(did.to_string()))?;
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| CryptoError::InvalidDidKey(format!("{}: {}", did, e)))?;
        if bytes.len() != 34 || bytes[..2] != ED25519_MULTICODEC {
            return Err(CryptoError::InvalidDidKey(format!(
                "{}: not an Ed25519 key",
                did
            )));
        }
        Self::from_bytes(&bytes[2..])
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}
