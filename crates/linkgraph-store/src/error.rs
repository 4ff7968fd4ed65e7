/// Document-store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("no outbound link to {target} in namespace {namespace}")]
    TargetNotFound { target: String, namespace: String },

    #[error("malformed graph document: {0}")]
    Malformed(String),

    #[error("write not authorized: {0}")]
    Unauthorized(String),

    #[error("document store transport error: {0}")]
    Transport(String),

    #[error("document store call timed out")]
    Timeout,
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else {
            StoreError::Transport(e.to_string())
        }
    }
}
