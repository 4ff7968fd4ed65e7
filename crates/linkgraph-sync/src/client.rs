use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::api::BackendApi;
use crate::error::SyncError;
use crate::types::{IdentitySummary, PopularAccount, SyncOperation, SyncRequest};

/// Submits graph mutations and treats anything but `SUCCESS` as a failure.
pub struct BackendSyncClient {
    api: Arc<dyn BackendApi>,
    timeout: Duration,
}

impl BackendSyncClient {
    pub fn new(api: Arc<dyn BackendApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    pub async fn follow(&self, request: &SyncRequest) -> Result<(), SyncError> {
        self.submit(SyncOperation::Follow, request).await
    }

    pub async fn unfollow(&self, request: &SyncRequest) -> Result<(), SyncError> {
        self.submit(SyncOperation::Unfollow, request).await
    }

    pub async fn set_alias(&self, request: &SyncRequest) -> Result<(), SyncError> {
        self.submit(SyncOperation::SetAlias, request).await
    }

    pub async fn identity(&self, address: &str) -> Result<IdentitySummary, SyncError> {
        self.bounded(self.api.identity(address)).await
    }

    pub async fn popular(
        &self,
        tag: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<PopularAccount>, SyncError> {
        self.bounded(self.api.popular(tag, viewer)).await
    }

    async fn submit(&self, operation: SyncOperation, request: &SyncRequest) -> Result<(), SyncError> {
        let response = self.bounded(self.api.submit(operation, request)).await?;
        if !response.is_success() {
            tracing::warn!(
                %operation,
                to = %request.to_addr,
                result = %response.result,
                "backend rejected mutation"
            );
            return Err(SyncError::Rejected {
                operation,
                result: response.result,
            });
        }
        tracing::info!(%operation, to = %request.to_addr, namespace = %request.namespace, "backend accepted mutation");
        Ok(())
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, SyncError>>,
    ) -> Result<T, SyncError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| SyncError::Timeout)?
    }
}
