/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("invalid did:key: {0}")]
    InvalidDidKey(String),

    #[error("malformed JWS: {0}")]
    MalformedJws(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
