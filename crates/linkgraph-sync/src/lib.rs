//! Linkgraph Backend Sync
//!
//! The backend service is the source of truth for the social graph. This
//! crate submits follow / unfollow / alias mutations to it and reads account
//! summaries back.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

pub use api::BackendApi;
pub use client::BackendSyncClient;
pub use error::SyncError;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use types::{
    IdentitySummary, PopularAccount, SyncOperation, SyncRequest, SyncResponse, SUCCESS,
};
