use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-key async locks. Holders of the same key run one at a time.
///
/// Share one instance between graph clients that may act for the same
/// identity.
#[derive(Debug, Default)]
pub struct SingleFlight {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `key`; released when the guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key.to_string()).or_default().clone();
        lock.lock_owned().await
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
