use async_trait::async_trait;

use crate::types::Did;

/// A compact JWS split into its base64url segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jws {
    pub protected: String,
    pub payload: String,
    pub signature: String,
}

impl Jws {
    /// `<protected>.<payload>.<signature>`
    pub fn to_compact(&self) -> String {
        format!("{}.{}.{}", self.protected, self.payload, self.signature)
    }

    /// Split a compact serialization. Empty segments are rejected.
    pub fn from_compact(compact: &str) -> Option<Self> {
        let mut parts = compact.split('.');
        let (protected, payload, signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some()
            || protected.is_empty()
            || payload.is_empty()
            || signature.is_empty()
        {
            return None;
        }
        Some(Self {
            protected: protected.to_string(),
            payload: payload.to_string(),
            signature: signature.to_string(),
        })
    }
}

/// Signs on behalf of a DID.
#[async_trait]
pub trait DidProvider: Send + Sync {
    /// The DID this provider controls.
    fn did(&self) -> &Did;

    /// Sign `payload` as a JWS. `None` means the provider produced no signature.
    async fn create_jws(&self, payload: &[u8]) -> Option<Jws>;
}
