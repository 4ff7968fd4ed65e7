use std::time::Duration;

use linkgraph_core::{Chain, CoreError};

/// Wallet signer errors.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("no {0} signer provider was supplied")]
    EmptyProvider(Chain),

    #[error("signer provider misconfigured: {0}")]
    AuthProvider(String),

    #[error("wallet rejected the request: {0}")]
    Rejected(String),

    #[error("wallet exposes no account")]
    NoAccount,

    #[error("wallet did not answer within {0:?}")]
    Timeout(Duration),
}

/// Session lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("authentication requested before a signer provider exists")]
    EmptyAuthProvider,

    #[error("document network client is not set")]
    StoreUnavailable,

    #[error("could not produce a signed claim: {0}")]
    SignJwt(String),

    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("session state error: {0}")]
    State(#[from] CoreError),
}

/// Account binding errors.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("binding registry error: {0}")]
    Registry(String),

    #[error("invalid binding proof: {0}")]
    InvalidProof(String),

    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("binding registry transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for BindingError {
    fn from(e: reqwest::Error) -> Self {
        BindingError::Transport(e.to_string())
    }
}
