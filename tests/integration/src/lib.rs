//! Shared fixtures for the cross-crate scenarios in `tests/`.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use linkgraph::{GraphFacade, GraphOptions, SignerProvider, SingleFlight};
use linkgraph_core::Did;
use linkgraph_identity::{EthProvider, LocalEthWallet, MemoryBindingRegistry, SignerError};
use linkgraph_store::{DocumentStore, MemoryDocumentStore, StoreError, WriteOptions};
use linkgraph_sync::MemoryBackend;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Timestamp handed out by the harness clock for tick `n`.
pub fn at(n: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + n, 0)
        .single()
        .unwrap_or_default()
}

/// In-memory collaborators shared by every facade a test builds.
pub struct Harness {
    pub backend: Arc<MemoryBackend>,
    pub store: Arc<MemoryDocumentStore>,
    pub registry: Arc<MemoryBindingRegistry>,
    pub flights: Arc<SingleFlight>,
    ticks: Arc<AtomicI64>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
            store: Arc::new(MemoryDocumentStore::new()),
            registry: Arc::new(MemoryBindingRegistry::new()),
            flights: Arc::new(SingleFlight::new()),
            ticks: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Timestamp of the most recent clock reading.
    pub fn last_time(&self) -> DateTime<Utc> {
        at(self.ticks.load(Ordering::SeqCst) - 1)
    }

    pub fn facade(&self, namespace: &str, signer: SignerProvider) -> GraphFacade {
        self.facade_with_store(namespace, signer, self.store.clone())
    }

    pub fn facade_with_store(
        &self,
        namespace: &str,
        signer: SignerProvider,
        store: Arc<dyn DocumentStore>,
    ) -> GraphFacade {
        let ticks = self.ticks.clone();
        GraphFacade::builder(GraphOptions::new(namespace))
            .signer(signer)
            .document_store(store)
            .binding_registry(self.registry.clone())
            .backend(self.backend.clone())
            .single_flight(self.flights.clone())
            .clock(Arc::new(move || at(ticks.fetch_add(1, Ordering::SeqCst))))
            .build()
            .unwrap_or_else(|e| panic!("facade construction failed: {}", e))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Local wallet that counts signing prompts.
pub struct CountingWallet {
    inner: LocalEthWallet,
    prompts: AtomicUsize,
}

impl CountingWallet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: LocalEthWallet::generate(),
            prompts: AtomicUsize::new(0),
        })
    }

    pub fn address(&self) -> &str {
        self.inner.address()
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn provider(self: &Arc<Self>) -> SignerProvider {
        SignerProvider::Eth(self.clone())
    }
}

#[async_trait]
impl EthProvider for CountingWallet {
    async fn accounts(&self) -> Result<Vec<String>, SignerError> {
        self.inner.accounts().await
    }

    async fn personal_sign(&self, address: &str, message: &[u8]) -> Result<String, SignerError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.inner.personal_sign(address, message).await
    }
}

/// Document store wrapper that can be switched offline and slowed down.
pub struct FlakyStore {
    inner: Arc<MemoryDocumentStore>,
    offline: AtomicBool,
    read_delay: Option<Duration>,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryDocumentStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            offline: AtomicBool::new(false),
            read_delay: None,
        })
    }

    /// Every read waits `delay` before answering.
    pub fn slow(inner: Arc<MemoryDocumentStore>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner,
            offline: AtomicBool::new(false),
            read_delay: Some(delay),
        })
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("node offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn load(&self, did: &Did, alias: &str) -> Result<Option<Value>, StoreError> {
        self.check()?;
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.load(did, alias).await
    }

    async fn save(
        &self,
        did: &Did,
        alias: &str,
        content: Value,
        options: WriteOptions,
    ) -> Result<(), StoreError> {
        self.check()?;
        self.inner.save(did, alias, content, options).await
    }

    fn store_id(&self) -> &str {
        "flaky"
    }
}
