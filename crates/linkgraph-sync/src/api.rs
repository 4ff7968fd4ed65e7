use async_trait::async_trait;

use crate::error::SyncError;
use crate::types::{IdentitySummary, PopularAccount, SyncOperation, SyncRequest, SyncResponse};

/// The authoritative graph backend.
///
/// Implementations report what the backend said; deciding whether a
/// response counts as success is left to [`crate::BackendSyncClient`].
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn submit(
        &self,
        operation: SyncOperation,
        request: &SyncRequest,
    ) -> Result<SyncResponse, SyncError>;

    /// Follow counts and edges of `address`.
    async fn identity(&self, address: &str) -> Result<IdentitySummary, SyncError>;

    /// Popular accounts under `tag`, as seen by `viewer`.
    async fn popular(
        &self,
        tag: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PopularAccount>, SyncError>;
}
