use linkgraph_store::StoreError;

use crate::error::GraphError;

/// State of the mirror document after an operation.
#[derive(Debug)]
pub enum MirrorStatus {
    Synced,
    /// The backend accepted the change but the mirror was not updated.
    Lagging(StoreError),
}

/// Outcome of a successful graph mutation.
///
/// The backend change is durable whenever a report is returned. Mirror
/// and binding problems are carried here instead of failing the call.
#[derive(Debug)]
pub struct OperationReport {
    pub mirror: MirrorStatus,
    pub binding_warning: Option<String>,
}

impl OperationReport {
    pub fn synced() -> Self {
        Self {
            mirror: MirrorStatus::Synced,
            binding_warning: None,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self.mirror, MirrorStatus::Synced)
    }

    pub fn mirror_error(&self) -> Option<&StoreError> {
        match &self.mirror {
            MirrorStatus::Synced => None,
            MirrorStatus::Lagging(e) => Some(e),
        }
    }

    /// Treat a lagging mirror as a failure.
    pub fn into_strict(self) -> Result<(), GraphError> {
        match self.mirror {
            MirrorStatus::Synced => Ok(()),
            MirrorStatus::Lagging(e) => Err(GraphError::Store(e)),
        }
    }
}
