//! Linkgraph
//!
//! Social graph client for wallet-derived identities. Graph mutations are
//! written to the authoritative backend first and then mirrored, best
//! effort, into a document owned by the user's DID.
//!
//! ```no_run
//! # async fn demo(wallet: std::sync::Arc<dyn linkgraph::EthProvider>) -> Result<(), linkgraph::GraphError> {
//! use linkgraph::{GraphFacade, GraphOptions, SignerProvider};
//!
//! let graph = GraphFacade::builder(GraphOptions::new("card"))
//!     .signer(SignerProvider::Eth(wallet))
//!     .build()?;
//! let report = graph.connect("0x8ddd03b89116ba89e28ef703fe037fc77bc58f1e", Some("vitalik")).await?;
//! if let Some(error) = report.mirror_error() {
//!     eprintln!("mirror lagging: {}", error);
//! }
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod facade;
pub mod reconcile;
pub mod report;
pub mod single_flight;

pub use clock::{Clock, SystemClock};
pub use error::GraphError;
pub use facade::{GraphFacade, GraphFacadeBuilder, DEFAULT_POPULAR_TAG};
pub use report::{MirrorStatus, OperationReport};
pub use single_flight::SingleFlight;

pub use linkgraph_core::{
    AccountId, BindingMode, BindingPolicy, Chain, Did, Environment, GraphOptions, Identity,
    OutboundLink, SessionState, Timeouts,
};
pub use linkgraph_identity::{
    EthProvider, LocalEthWallet, LocalSolanaWallet, SignerProvider, SolanaWallet,
};
pub use linkgraph_sync::{IdentitySummary, PopularAccount};
