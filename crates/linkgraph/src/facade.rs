//! The caller-facing graph client.

use linkgraph_core::{
    BindingPolicy, Endpoint, GraphOptions, Identity, OutboundLink, SessionState,
};
use linkgraph_identity::{
    AccountBinder, AccountBinding, BindingRegistry, ChainSigner, DidFactory, Ed25519DidFactory,
    HttpBindingRegistry, Session, SessionError, SessionManager, SignerProvider,
};
use linkgraph_store::{DocumentStore, GraphStoreClient, HttpDocumentStore, StoreError};
use linkgraph_sync::{
    BackendApi, BackendSyncClient, HttpBackend, IdentitySummary, PopularAccount, SyncOperation,
    SyncRequest,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::clock::{Clock, SystemClock};
use crate::error::GraphError;
use crate::reconcile;
use crate::report::{MirrorStatus, OperationReport};
use crate::single_flight::SingleFlight;

/// Tag the popular-accounts listing is filtered by when none is given.
pub const DEFAULT_POPULAR_TAG: &str = "PLAZA";

#[derive(Debug, Clone, Copy)]
enum Mutation<'a> {
    Connect { alias: Option<&'a str> },
    Disconnect,
    SetAlias { alias: &'a str },
}

impl Mutation<'_> {
    fn operation(&self) -> SyncOperation {
        match self {
            Mutation::Connect { .. } => SyncOperation::Follow,
            Mutation::Disconnect => SyncOperation::Unfollow,
            Mutation::SetAlias { .. } => SyncOperation::SetAlias,
        }
    }

    fn alias(&self) -> Option<&str> {
        match *self {
            Mutation::Connect { alias } => alias,
            Mutation::Disconnect => None,
            Mutation::SetAlias { alias } => Some(alias),
        }
    }
}

/// Collaborators for a [`GraphFacade`]. Anything left unset talks to the
/// endpoints of the configured environment over HTTP.
pub struct GraphFacadeBuilder {
    options: GraphOptions,
    signer: Option<SignerProvider>,
    document_store: Option<Arc<dyn DocumentStore>>,
    binding_registry: Option<Arc<dyn BindingRegistry>>,
    backend: Option<Arc<dyn BackendApi>>,
    did_factory: Option<Arc<dyn DidFactory>>,
    single_flight: Option<Arc<SingleFlight>>,
    clock: Option<Arc<dyn Clock>>,
}

impl GraphFacadeBuilder {
    pub fn signer(mut self, provider: SignerProvider) -> Self {
        self.signer = Some(provider);
        self
    }

    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    pub fn binding_registry(mut self, registry: Arc<dyn BindingRegistry>) -> Self {
        self.binding_registry = Some(registry);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn BackendApi>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn did_factory(mut self, factory: Arc<dyn DidFactory>) -> Self {
        self.did_factory = Some(factory);
        self
    }

    /// Serialize mutations with other clients sharing `flights`.
    pub fn single_flight(mut self, flights: Arc<SingleFlight>) -> Self {
        self.single_flight = Some(flights);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<GraphFacade, GraphError> {
        self.options.validate()?;
        let endpoint = self.options.endpoint();
        let network = self.options.timeouts.network();

        let signer = ChainSigner::new(
            self.options.chain,
            self.signer,
            self.options.timeouts.signer(),
        )?;

        let document_store: Arc<dyn DocumentStore> = match self.document_store {
            Some(store) => store,
            None => Arc::new(HttpDocumentStore::new(
                &endpoint.document_network_url,
                network,
            )?),
        };
        let binding_registry: Arc<dyn BindingRegistry> = match self.binding_registry {
            Some(registry) => registry,
            None => Arc::new(HttpBindingRegistry::new(
                &endpoint.document_network_url,
                network,
            )?),
        };
        let backend: Arc<dyn BackendApi> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(HttpBackend::new(&endpoint.backend_api_url, network)?),
        };
        let did_factory = self
            .did_factory
            .unwrap_or_else(|| Arc::new(Ed25519DidFactory));

        let sessions = SessionManager::new(
            Some(Arc::new(signer)),
            did_factory,
            self.options.chain_ref(),
        )
        .with_document_store(document_store);

        tracing::info!(
            namespace = %self.options.namespace,
            chain = %self.options.chain,
            backend = %endpoint.backend_api_url,
            "graph client created"
        );

        Ok(GraphFacade {
            binder: AccountBinder::new(binding_registry, self.options.binding_mode),
            backend: BackendSyncClient::new(backend, network),
            sessions,
            store: OnceCell::new(),
            single_flight: self.single_flight.unwrap_or_default(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            endpoint,
            options: self.options,
        })
    }
}

/// Social graph client for one wallet and namespace.
pub struct GraphFacade {
    options: GraphOptions,
    endpoint: Endpoint,
    sessions: SessionManager,
    binder: AccountBinder,
    backend: BackendSyncClient,
    store: OnceCell<GraphStoreClient>,
    single_flight: Arc<SingleFlight>,
    clock: Arc<dyn Clock>,
}

impl GraphFacade {
    pub fn builder(options: GraphOptions) -> GraphFacadeBuilder {
        GraphFacadeBuilder {
            options,
            signer: None,
            document_store: None,
            binding_registry: None,
            backend: None,
            did_factory: None,
            single_flight: None,
            clock: None,
        }
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn session_state(&self) -> SessionState {
        self.sessions.state()
    }

    /// Binding published by this client, if any.
    pub fn binding(&self) -> Option<&AccountBinding> {
        self.binder.current()
    }

    /// Authenticate if needed and return the session.
    pub async fn authenticate(&self) -> Result<Arc<Session>, GraphError> {
        Ok(self.sessions.ensure_authenticated().await?)
    }

    pub async fn identity(&self) -> Result<Identity, GraphError> {
        Ok(self.authenticate().await?.identity().clone())
    }

    /// Follow `target`, optionally naming it.
    pub async fn connect(
        &self,
        target: &str,
        alias: Option<&str>,
    ) -> Result<OperationReport, GraphError> {
        self.mutate(target, Mutation::Connect { alias }).await
    }

    pub async fn disconnect(&self, target: &str) -> Result<OperationReport, GraphError> {
        self.mutate(target, Mutation::Disconnect).await
    }

    /// Rename a followed `target`. A target missing from the mirror is
    /// reported as [`StoreError::TargetNotFound`] lag; the backend change
    /// stands.
    pub async fn set_alias(&self, target: &str, alias: &str) -> Result<OperationReport, GraphError> {
        self.mutate(target, Mutation::SetAlias { alias }).await
    }

    /// Links currently held in the mirror document, across all namespaces.
    pub async fn links(&self) -> Result<Vec<OutboundLink>, GraphError> {
        let session = self.authenticate().await?;
        let store = self.store_client(&session).await?;
        let links = tokio::time::timeout(self.options.timeouts.network(), store.read_links())
            .await
            .map_err(|_| StoreError::Timeout)??;
        Ok(links)
    }

    /// Follow counts and edges of `address` as the backend sees them.
    pub async fn account_info(&self, address: &str) -> Result<IdentitySummary, GraphError> {
        Ok(self.backend.identity(address).await?)
    }

    /// Popular accounts under `tag`, flagged with whether this wallet
    /// follows them once a session exists.
    pub async fn popular_accounts(&self, tag: Option<&str>) -> Result<Vec<PopularAccount>, GraphError> {
        let session = self.sessions.current();
        let viewer = session.as_ref().map(|s| s.wallet_address());
        Ok(self
            .backend
            .popular(tag.unwrap_or(DEFAULT_POPULAR_TAG), viewer)
            .await?)
    }

    async fn mutate(&self, target: &str, mutation: Mutation<'_>) -> Result<OperationReport, GraphError> {
        let session = self.authenticate().await?;
        let _flight = self.single_flight.acquire(session.did().uri()).await;

        let binding_warning = self.bind(&session).await?;

        let request = SyncRequest {
            from_addr: session.wallet_address().to_string(),
            to_addr: target.to_string(),
            namespace: self.options.namespace.clone(),
            alias: mutation.alias().map(String::from),
            signature: session.sign_claim(target).await?,
            network: session.identity().chain.network_tag().to_string(),
        };
        match mutation {
            Mutation::Connect { .. } => self.backend.follow(&request).await?,
            Mutation::Disconnect => self.backend.unfollow(&request).await?,
            Mutation::SetAlias { .. } => self.backend.set_alias(&request).await?,
        }

        let mirror = match self.reconcile(&session, target, mutation).await {
            Ok(()) => MirrorStatus::Synced,
            Err(e) => {
                tracing::warn!(
                    did = %session.did(),
                    to = target,
                    operation = %mutation.operation(),
                    error = %e,
                    "mirror update failed; backend change stands"
                );
                MirrorStatus::Lagging(e)
            }
        };

        tracing::info!(
            did = %session.did(),
            to = target,
            operation = %mutation.operation(),
            "graph operation complete"
        );
        Ok(OperationReport {
            mirror,
            binding_warning,
        })
    }

    async fn bind(&self, session: &Session) -> Result<Option<String>, GraphError> {
        let signer = self
            .sessions
            .signer()
            .ok_or(SessionError::EmptyAuthProvider)?;
        match self.binder.ensure_bound(session, signer).await {
            Ok(_) => Ok(None),
            Err(e) => match self.options.binding_policy {
                BindingPolicy::Abort => Err(e.into()),
                BindingPolicy::Warn => {
                    tracing::warn!(
                        account = %session.identity().auth_id,
                        error = %e,
                        "account binding failed; continuing"
                    );
                    Ok(Some(e.to_string()))
                }
            },
        }
    }

    async fn reconcile(
        &self,
        session: &Session,
        target: &str,
        mutation: Mutation<'_>,
    ) -> Result<(), StoreError> {
        let store = self.store_client(session).await?;
        let namespace = self.options.namespace.as_str();
        let update = async {
            let mut links = store.read_links().await?;
            match mutation {
                Mutation::Connect { alias } => {
                    reconcile::apply_connect(&mut links, target, namespace, alias, self.clock.now());
                }
                Mutation::Disconnect => {
                    reconcile::apply_disconnect(&mut links, target, namespace);
                }
                Mutation::SetAlias { alias } => {
                    reconcile::apply_set_alias(&mut links, target, namespace, alias)?;
                }
            }
            store.write_links(links).await
        };
        tokio::time::timeout(self.options.timeouts.network(), update)
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    async fn store_client(&self, session: &Session) -> Result<&GraphStoreClient, StoreError> {
        self.store
            .get_or_try_init(|| async {
                let document_store = self
                    .sessions
                    .document_store()
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                Ok(GraphStoreClient::open(
                    document_store,
                    session.did_provider(),
                    self.endpoint.graph_schema_id.clone(),
                ))
            })
            .await
    }
}
