use ed25519_dalek::Signer;
use ed25519_dalek::Verifier;

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

/// Ed25519 signature (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inner: ed25519_dalek::Signature,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        self.inner.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_arr: [u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidInput(format!("signature must be 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Self {
            inner: ed25519_dalek::Signature::from_bytes(&bytes_arr),
        })
    }

    /// Base58 encoding, as Solana wallets present signatures.
    pub fn to_bs58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }
}

/// Sign a message using Ed25519.
pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    Signature {
        inner: keypair.signing_key().sign(message),
    }
}

/// Verify an Ed25519 signature.
pub fn verify(message: &[u8], signature: &Signature, pubkey: &PublicKey) -> Result<(), CryptoError> {
    pubkey
        .verifying_key()
        .verify(message, &signature.inner)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
