//! Linkgraph Document Store Layer
//!
//! Reads and writes the user-owned graph document:
//! - [`DocumentStore`]: narrow get/set contract of the document network
//! - [`MemoryDocumentStore`]: in-process store, verifies did:key writes
//! - [`HttpDocumentStore`]: HTTP client for a document network node
//! - [`GraphStoreClient`]: outbound-link view over one DID's document

pub mod client;
pub mod document;
pub mod error;
pub mod http;
pub mod memory;

pub use client::GraphStoreClient;
pub use document::{DocumentStore, WriteOptions};
pub use error::StoreError;
pub use http::HttpDocumentStore;
pub use memory::{MemoryDocumentStore, StoredDocument};
