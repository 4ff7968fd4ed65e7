pub mod config;
pub mod did;
pub mod error;
pub mod state_machine;
pub mod types;

pub use config::{BindingMode, BindingPolicy, EndpointOverrides, GraphOptions, Timeouts};
pub use did::{DidProvider, Jws};
pub use error::{ConfigError, CoreError};
pub use state_machine::{SessionEvent, SessionState, SessionStateMachine};
pub use types::{
    AccountId, Chain, ConnectionType, Did, Endpoint, Environment, GraphDocument, Identity,
    OutboundLink, GRAPH_DOCUMENT_ALIAS,
};
