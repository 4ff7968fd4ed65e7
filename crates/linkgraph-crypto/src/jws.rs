//! Compact JWS (RFC 7515) with EdDSA over Ed25519 keys.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use linkgraph_core::Jws;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};
use crate::signing::{self, Signature};

#[derive(Debug, Serialize, Deserialize)]
struct ProtectedHeader {
    alg: String,
    kid: String,
}

/// Sign `payload` as a JWS whose key id is `kid`.
pub fn sign_jws(payload: &[u8], keypair: &KeyPair, kid: &str) -> Jws {
    let header = ProtectedHeader {
        alg: "EdDSA".into(),
        kid: kid.into(),
    };
    // Serializing a struct of two strings cannot fail.
    let header_json = serde_json::to_vec(&header).unwrap_or_default();
    let protected = URL_SAFE_NO_PAD.encode(header_json);
    let payload = URL_SAFE_NO_PAD.encode(payload);
    let signing_input = format!("{}.{}", protected, payload);
    let signature = signing::sign(signing_input.as_bytes(), keypair);
    Jws {
        protected,
        payload,
        signature: URL_SAFE_NO_PAD.encode(signature.to_bytes()),
    }
}

/// Verify a JWS against `pubkey` and return the decoded payload.
pub fn verify_jws(jws: &Jws, pubkey: &PublicKey) -> Result<Vec<u8>, CryptoError> {
    let header_bytes = URL_SAFE_NO_PAD
        .decode(&jws.protected)
        .map_err(|e| CryptoError::MalformedJws(format!("protected header: {}", e)))?;
    let header: ProtectedHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| CryptoError::MalformedJws(format!("protected header: {}", e)))?;
    if header.alg != "EdDSA" {
        return Err(CryptoError::MalformedJws(format!(
            "unsupported alg {}",
            header.alg
        )));
    }
    let sig_bytes = URL_SAFE_NO_PAD
        .decode(&jws.signature)
        .map_err(|e| CryptoError::MalformedJws(format!("signature: {}", e)))?;
    let signature = Signature::from_bytes(&sig_bytes)?;
    let signing_input = format!("{}.{}", jws.protected, jws.payload);
    signing::verify(signing_input.as_bytes(), &signature, pubkey)?;
    URL_SAFE_NO_PAD
        .decode(&jws.payload)
        .map_err(|e| CryptoError::MalformedJws(format!("payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_jws() {
        let kp = KeyPair::from_seed(&[3u8; 32]);
        let did = kp.public_key().to_did_key();
        let jws = sign_jws(br#"{"targetAddress":"0xabc"}"#, &kp, &did);
        let payload = verify_jws(&jws, &kp.public_key()).unwrap();
        assert_eq!(payload, br#"{"targetAddress":"0xabc"}"#);
    }

    #[test]
    fn test_compact_has_three_segments() {
        let kp = KeyPair::generate();
        let compact = sign_jws(b"{}", &kp, "did:key:z").to_compact();
        assert_eq!(compact.split('.').count(), 3);
        assert!(!compact.contains('='));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let kp = KeyPair::generate();
        let mut jws = sign_jws(b"original", &kp, "kid");
        jws.payload = URL_SAFE_NO_PAD.encode(b"tampered");
        assert!(verify_jws(&jws, &kp.public_key()).is_err());
    }

    #[test]
    fn test_wrong_key_fails() {
        let jws = sign_jws(b"payload", &KeyPair::generate(), "kid");
        assert!(verify_jws(&jws, &KeyPair::generate().public_key()).is_err());
    }
}
