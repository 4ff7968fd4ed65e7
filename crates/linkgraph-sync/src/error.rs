use crate::types::SyncOperation;

/// Backend sync errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("backend rejected {operation}: {result}")]
    Rejected {
        operation: SyncOperation,
        result: String,
    },

    #[error("backend transport error: {0}")]
    Transport(String),

    #[error("backend did not answer in time")]
    Timeout,
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}
