use std::fmt;

use crate::error::CoreError;

/// Authentication lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SessionState {
    /// No signature has been requested yet.
    Unauthenticated,
    /// The wallet signed the challenge; no DID yet.
    SignatureObtained,
    /// A DID is bound to the derived secret. Final state.
    DidAuthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::DidAuthenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Unauthenticated"),
            Self::SignatureObtained => write!(f, "SignatureObtained"),
            Self::DidAuthenticated => write!(f, "DidAuthenticated"),
        }
    }
}

/// Events that move a session forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The wallet returned a signature of the challenge.
    SignatureReceived,
    /// The DID provider was constructed from the derived secret.
    DidCreated,
    /// Signing or DID construction failed; start over.
    Failed,
}

/// Valid transitions:
/// - Unauthenticated → SignatureObtained (SignatureReceived)
/// - SignatureObtained → DidAuthenticated (DidCreated)
/// - SignatureObtained → Unauthenticated (Failed)
/// - Unauthenticated → Unauthenticated (Failed)
pub struct SessionStateMachine;

impl SessionStateMachine {
    pub fn transition(current: SessionState, event: SessionEvent) -> Result<SessionState, CoreError> {
        let next = match (current, event) {
            (SessionState::Unauthenticated, SessionEvent::SignatureReceived) => {
                SessionState::SignatureObtained
            }
            (SessionState::SignatureObtained, SessionEvent::DidCreated) => {
                SessionState::DidAuthenticated
            }
            (SessionState::Unauthenticated | SessionState::SignatureObtained, SessionEvent::Failed) => {
                SessionState::Unauthenticated
            }
            (from, event) => {
                let to = match event {
                    SessionEvent::SignatureReceived => SessionState::SignatureObtained,
                    SessionEvent::DidCreated => SessionState::DidAuthenticated,
                    SessionEvent::Failed => SessionState::Unauthenticated,
                };
                return Err(CoreError::InvalidStateTransition { from, to });
            }
        };
        Ok(next)
    }
}
