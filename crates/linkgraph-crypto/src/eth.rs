//! Ethereum account keys and EIP-191 `personal_sign` signatures.

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Digest signed by `personal_sign`: keccak256 of the prefixed message.
fn personal_digest(message: &[u8]) -> [u8; 32] {
    let mut prefixed = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
    prefixed.extend_from_slice(message);
    keccak256(&prefixed)
}

/// Lowercase 0x-address of an uncompressed secp256k1 public key.
fn address_of(public_key: &PublicKey) -> String {
    let uncompressed = public_key.serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// A secp256k1 account key.
pub struct EthKey {
    secret: SecretKey,
}

impl EthKey {
    /// Generate a random key.
    pub fn generate() -> Self {
        loop {
            let mut bytes = Zeroizing::new([0u8; 32]);
            OsRng.fill_bytes(&mut bytes[..]);
            if let Ok(secret) = SecretKey::from_slice(&bytes[..]) {
                return Self { secret };
            }
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        Ok(Self { secret })
    }

    /// Parse a hex secret, with or without `0x`.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let trimmed = hex_str.trim();
        let bytes = Zeroizing::new(
            hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
                .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?,
        );
        Self::from_slice(&bytes)
    }

    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.secret.secret_bytes()))
    }

    /// Account address (lowercase 0x-hex).
    pub fn address(&self) -> String {
        let secp = Secp256k1::new();
        address_of(&PublicKey::from_secret_key(&secp, &self.secret))
    }

    /// EIP-191 `personal_sign`: 65 bytes `r || s || v` with `v` in {27, 28}.
    pub fn personal_sign(&self, message: &[u8]) -> Result<[u8; 65], CryptoError> {
        let secp = Secp256k1::new();
        let digest = Message::from_digest_slice(&personal_digest(message))
            .map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
        let (recovery_id, compact) = secp
            .sign_ecdsa_recoverable(&digest, &self.secret)
            .serialize_compact();
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&compact);
        out[64] = 27 + recovery_id.to_i32() as u8;
        Ok(out)
    }
}

/// Recover the address that produced a `personal_sign` signature.
pub fn recover_personal_signer(message: &[u8], signature: &[u8]) -> Result<String, CryptoError> {
    if signature.len() != 65 {
        return Err(CryptoError::InvalidInput(format!(
            "signature must be 65 bytes, got {}",
            signature.len()
        )));
    }
    let v = match signature[64] {
        27 | 28 => signature[64] - 27,
        0 | 1 => signature[64],
        other => {
            return Err(CryptoError::InvalidInput(format!("invalid recovery byte {}", other)))
        }
    };
    let recovery_id = RecoveryId::from_i32(v as i32)
        .map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|_| CryptoError::SignatureVerificationFailed)?;
    let digest = Message::from_digest_slice(&personal_digest(message))
        .map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
    let public_key = Secp256k1::new()
        .recover_ecdsa(&digest, &recoverable)
        .map_err(|_| CryptoError::SignatureVerificationFailed)?;
    Ok(address_of(&public_key))
}
