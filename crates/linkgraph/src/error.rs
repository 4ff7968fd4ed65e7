use linkgraph_core::ConfigError;
use linkgraph_identity::{BindingError, SessionError, SignerError};
use linkgraph_store::StoreError;
use linkgraph_sync::SyncError;

/// Errors surfaced by [`crate::GraphFacade`].
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("account binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("backend error: {0}")]
    Backend(#[from] SyncError),

    #[error("document store error: {0}")]
    Store(#[from] StoreError),
}

impl GraphError {
    /// Which stage of an operation failed.
    pub fn stage(&self) -> &'static str {
        match self {
            GraphError::Config(_) => "config",
            GraphError::Signer(_) | GraphError::Session(SessionError::Signer(_)) => "signer",
            GraphError::Session(_) => "session",
            GraphError::Binding(_) => "binding",
            GraphError::Backend(_) => "backend",
            GraphError::Store(_) => "store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgraph_sync::SyncOperation;

    #[test]
    fn test_stage_names() {
        assert_eq!(GraphError::from(ConfigError::EmptyNamespace).stage(), "config");
        assert_eq!(
            GraphError::from(SessionError::Signer(SignerError::NoAccount)).stage(),
            "signer"
        );
        assert_eq!(GraphError::from(SessionError::StoreUnavailable).stage(), "session");
        assert_eq!(
            GraphError::from(SyncError::Rejected {
                operation: SyncOperation::Follow,
                result: "NOPE".into()
            })
            .stage(),
            "backend"
        );
    }
}
