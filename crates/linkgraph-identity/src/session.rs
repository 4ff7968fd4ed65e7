//! Wallet-derived DID sessions.
//!
//! The first call to [`SessionManager::ensure_authenticated`] asks the wallet
//! to sign [`AUTH_CHALLENGE`], hashes the signature into a 32-byte secret and
//! seeds the DID provider with it. The same wallet therefore always yields
//! the same DID. The resulting [`Session`] is cached for the manager's
//! lifetime.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use linkgraph_core::{
    Did, DidProvider, Identity, SessionEvent, SessionState, SessionStateMachine,
};
use linkgraph_crypto::derive_secret;
use linkgraph_store::DocumentStore;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::OnceCell;
use zeroize::Zeroizing;

use crate::did::DidFactory;
use crate::error::SessionError;
use crate::signer::ChainSigner;

/// Challenge the wallet signs to derive the session secret.
pub const AUTH_CHALLENGE: &str = "Allow this account to control your identity";

/// An authenticated session. Immutable once created.
pub struct Session {
    identity: Identity,
    signature: String,
    derived_secret: Zeroizing<[u8; 32]>,
    did_provider: Arc<dyn DidProvider>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetClaim<'a> {
    timestamp: i64,
    target_address: &'a str,
}

impl Session {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn did(&self) -> &Did {
        &self.identity.did
    }

    pub fn wallet_address(&self) -> &str {
        &self.identity.wallet_address
    }

    /// The wallet's signature of [`AUTH_CHALLENGE`].
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn derived_secret(&self) -> &[u8; 32] {
        &self.derived_secret
    }

    pub fn did_provider(&self) -> Arc<dyn DidProvider> {
        self.did_provider.clone()
    }

    /// Sign `{timestamp, targetAddress}` with the session DID and return the
    /// compact `<protected>.<payload>.<signature>` form.
    pub async fn sign_claim(&self, target: &str) -> Result<String, SessionError> {
        let claim = TargetClaim {
            timestamp: Utc::now().timestamp_millis(),
            target_address: target,
        };
        let payload =
            serde_json::to_vec(&claim).map_err(|e| SessionError::SignJwt(e.to_string()))?;
        let jws = self
            .did_provider
            .create_jws(&payload)
            .await
            .ok_or_else(|| SessionError::SignJwt(format!("{} produced no signature", self.did())))?;
        if jws.signature.is_empty() {
            return Err(SessionError::SignJwt("empty signature".into()));
        }
        if jws.payload.is_empty() {
            // Detached JWS: re-attach the payload we signed.
            return Ok(format!(
                "{}.{}.{}",
                jws.protected,
                URL_SAFE_NO_PAD.encode(&payload),
                jws.signature
            ));
        }
        Ok(jws.to_compact())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Owns the session lifecycle for one graph client.
pub struct SessionManager {
    signer: Option<Arc<ChainSigner>>,
    did_factory: Arc<dyn DidFactory>,
    document_store: Option<Arc<dyn DocumentStore>>,
    chain_ref: String,
    session: OnceCell<Arc<Session>>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(
        signer: Option<Arc<ChainSigner>>,
        did_factory: Arc<dyn DidFactory>,
        chain_ref: impl Into<String>,
    ) -> Self {
        Self {
            signer,
            did_factory,
            document_store: None,
            chain_ref: chain_ref.into(),
            session: OnceCell::new(),
            state: RwLock::new(SessionState::Unauthenticated),
        }
    }

    /// Attach the document network client the session's DID writes to.
    pub fn with_document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    pub fn signer(&self) -> Option<&Arc<ChainSigner>> {
        self.signer.as_ref()
    }

    pub fn document_store(&self) -> Result<Arc<dyn DocumentStore>, SessionError> {
        self.document_store
            .clone()
            .ok_or(SessionError::StoreUnavailable)
    }

    pub fn state(&self) -> SessionState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// The cached session, if authentication already succeeded.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.session.get().cloned()
    }

    /// Return the session, authenticating on first use. Concurrent callers
    /// share a single wallet prompt.
    pub async fn ensure_authenticated(&self) -> Result<Arc<Session>, SessionError> {
        if let Some(session) = self.session.get() {
            tracing::debug!(did = %session.did(), "session already authenticated");
            return Ok(session.clone());
        }
        self.session
            .get_or_try_init(|| self.authenticate())
            .await
            .cloned()
    }

    async fn authenticate(&self) -> Result<Arc<Session>, SessionError> {
        let signer = self.signer.as_ref().ok_or(SessionError::EmptyAuthProvider)?;
        if self.document_store.is_none() {
            return Err(SessionError::StoreUnavailable);
        }

        let signed = async {
            let address = signer.current_address().await?;
            let signature = signer.authenticate(AUTH_CHALLENGE).await?;
            Ok::<_, SessionError>((address, signature))
        }
        .await;
        let (wallet_address, signature) = match signed {
            Ok(signed) => signed,
            Err(e) => {
                tracing::warn!(error = %e, "wallet authentication failed");
                self.advance(SessionEvent::Failed)?;
                return Err(e);
            }
        };
        self.advance(SessionEvent::SignatureReceived)?;

        let derived_secret = derive_secret(&signature);
        let did_provider = match self.did_factory.create(&derived_secret) {
            Ok(provider) => provider,
            Err(e) => {
                self.advance(SessionEvent::Failed)?;
                return Err(e);
            }
        };
        self.advance(SessionEvent::DidCreated)?;

        let identity = Identity::new(
            wallet_address,
            signer.chain(),
            self.chain_ref.clone(),
            did_provider.did().clone(),
        );
        tracing::info!(
            did = %identity.did,
            account = %identity.auth_id,
            "session authenticated"
        );

        Ok(Arc::new(Session {
            identity,
            signature,
            derived_secret,
            did_provider,
        }))
    }

    fn advance(&self, event: SessionEvent) -> Result<SessionState, SessionError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let next = SessionStateMachine::transition(*state, event)?;
        *state = next;
        Ok(next)
    }
}
