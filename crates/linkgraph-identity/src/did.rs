use async_trait::async_trait;
use linkgraph_core::{Did, DidProvider, Jws};
use linkgraph_crypto::{sign_jws, KeyPair};
use std::sync::Arc;

use crate::error::SessionError;

/// Builds the DID provider for a session from its derived secret.
pub trait DidFactory: Send + Sync {
    fn create(&self, secret: &[u8; 32]) -> Result<Arc<dyn DidProvider>, SessionError>;
}

/// Seeds an Ed25519 keypair with the secret and identifies it as `did:key`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519DidFactory;

impl DidFactory for Ed25519DidFactory {
    fn create(&self, secret: &[u8; 32]) -> Result<Arc<dyn DidProvider>, SessionError> {
        Ok(Arc::new(Ed25519DidProvider::from_seed(secret)?))
    }
}

/// `did:key` provider over an Ed25519 keypair.
pub struct Ed25519DidProvider {
    did: Did,
    kid: String,
    keypair: KeyPair,
}

impl Ed25519DidProvider {
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, SessionError> {
        let keypair = KeyPair::from_seed(seed);
        let did = Did::new(keypair.public_key().to_did_key())?;
        let kid = format!("{}#{}", did, did.identifier());
        Ok(Self { did, kid, keypair })
    }
}

#[async_trait]
impl DidProvider for Ed25519DidProvider {
    fn did(&self) -> &Did {
        &self.did
    }

    async fn create_jws(&self, payload: &[u8]) -> Option<Jws> {
        Some(sign_jws(payload, &self.keypair, &self.kid))
    }
}
