use crate::state_machine::SessionState;

/// Core type and parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid session state transition from {from} to {to}")]
    InvalidStateTransition { from: SessionState, to: SessionState },

    #[error("invalid DID format: {0}")]
    InvalidDid(String),

    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Construction-time configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("namespace must not be empty")]
    EmptyNamespace,

    #[error("invalid chain reference {chain_ref:?} for {chain}")]
    InvalidChainRef { chain: String, chain_ref: String },

    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),

    #[error("failed to load configuration: {0}")]
    Load(String),
}
