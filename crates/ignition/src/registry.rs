//! Workspace resource registry.
//!
//! Maps each [`WorkspaceRoot`] to one shared [`ResourcePair`]. The first
//! `acquire` for a root starts creating the pair and leaves a pending marker in
//! the map; later callers await that same creation instead of starting their
//! own. Creation runs in its own task, so callers that stop waiting do not
//! cancel it.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use ignition_analyzer::{AnalysisEngine, PackageAnalyzer};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::IgnitionConfig;
use crate::error::{IgnitionError, Result};
use crate::resolver::ModuleResolver;
use crate::server::{AssetServer, ServedAddress};
use crate::workspace::WorkspaceRoot;

/// The asset server and module resolver of one workspace.
#[derive(Debug)]
pub struct ResourcePair {
    pub server: AssetServer,
    pub resolver: ModuleResolver,
}

impl ResourcePair {
    pub fn new(server: AssetServer, resolver: ModuleResolver) -> Self {
        Self { server, resolver }
    }

    pub fn address(&self) -> ServedAddress {
        self.server.address()
    }
}

/// Creates the resources of a workspace.
#[async_trait]
pub trait ResourceFactory: Send + Sync + 'static {
    async fn create(&self, root: &WorkspaceRoot) -> Result<ResourcePair>;
}

/// Loads a [`PackageAnalyzer`] for the root and starts an [`AssetServer`] on it.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerServerFactory {
    config: IgnitionConfig,
}

impl AnalyzerServerFactory {
    pub fn new(config: IgnitionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ResourceFactory for AnalyzerServerFactory {
    async fn create(&self, root: &WorkspaceRoot) -> Result<ResourcePair> {
        let engine: Arc<dyn AnalysisEngine> =
            Arc::new(PackageAnalyzer::load(root, &self.config.resolve).await?);
        let server = AssetServer::start(root.clone(), engine.clone(), &self.config.server).await?;
        Ok(ResourcePair::new(server, ModuleResolver::new(engine)))
    }
}

type Creation = Shared<BoxFuture<'static, Result<Arc<ResourcePair>, Arc<IgnitionError>>>>;

enum Slot {
    Pending { generation: u64, creation: Creation },
    Ready(Arc<ResourcePair>),
}

type Slots = Arc<Mutex<HashMap<WorkspaceRoot, Slot>>>;

/// Process-wide cache of per-workspace resources.
///
/// At most one [`ResourcePair`] exists per root. A failed creation leaves no
/// entry behind, so the next `acquire` retries from scratch.
pub struct WorkspaceRegistry {
    factory: Arc<dyn ResourceFactory>,
    slots: Slots,
    generations: AtomicU64,
}

impl WorkspaceRegistry {
    pub fn new(factory: impl ResourceFactory) -> Self {
        Self {
            factory: Arc::new(factory),
            slots: Slots::default(),
            generations: AtomicU64::new(0),
        }
    }

    /// Registry creating real analyzers and servers from `config`.
    pub fn with_config(config: IgnitionConfig) -> Self {
        Self::new(AnalyzerServerFactory::new(config))
    }

    /// The resources of `root`, created on first use.
    ///
    /// Concurrent calls for the same root share one creation and all receive
    /// the same pair, or the same error.
    pub async fn acquire(&self, root: &WorkspaceRoot) -> Result<Arc<ResourcePair>> {
        let creation = {
            let mut slots = self.slots.lock();
            match slots.get(root) {
                Some(Slot::Ready(pair)) => {
                    debug!(root = %root, "reusing workspace resources");
                    return Ok(pair.clone());
                }
                Some(Slot::Pending { creation, .. }) => {
                    debug!(root = %root, "waiting for workspace resources");
                    creation.clone()
                }
                None => {
                    let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                    let creation = self.spawn_creation(root.clone(), generation);
                    slots.insert(
                        root.clone(),
                        Slot::Pending {
                            generation,
                            creation: creation.clone(),
                        },
                    );
                    creation
                }
            }
        };

        creation
            .await
            .map_err(|source| IgnitionError::startup(root.as_path(), source))
    }

    /// Start creating the pair for `root` in a background task.
    ///
    /// Must be called with the slot lock held; the task settles the slot only
    /// after the caller has inserted its pending marker.
    fn spawn_creation(&self, root: WorkspaceRoot, generation: u64) -> Creation {
        let factory = self.factory.clone();
        let slots = self.slots.clone();

        let task = tokio::spawn(async move {
            info!(root = %root, "creating workspace resources");
            let result = match AssertUnwindSafe(factory.create(&root)).catch_unwind().await {
                Ok(Ok(pair)) => Ok(Arc::new(pair)),
                Ok(Err(e)) => Err(Arc::new(e)),
                Err(_) => Err(Arc::new(IgnitionError::Server(
                    "resource factory panicked".to_string(),
                ))),
            };

            let mut slots = slots.lock();
            let current = matches!(
                slots.get(&root),
                Some(Slot::Pending { generation: g, .. }) if *g == generation
            );
            match &result {
                Ok(pair) if current => {
                    info!(root = %root, address = %pair.address(), "workspace resources ready");
                    slots.insert(root, Slot::Ready(pair.clone()));
                }
                Err(e) if current => {
                    warn!(root = %root, error = %e, "failed to create workspace resources");
                    slots.remove(&root);
                }
                _ => debug!(root = %root, "workspace was released during creation"),
            }
            result
        });

        async move {
            task.await.unwrap_or_else(|e| {
                Err(Arc::new(IgnitionError::Server(format!(
                    "resource creation task failed: {e}"
                ))))
            })
        }
        .boxed()
        .shared()
    }

    /// Forget the resources of `root` and stop its server.
    ///
    /// Returns `false` if nothing was registered. A creation still in flight
    /// completes for its current waiters but is not stored.
    pub async fn release(&self, root: &WorkspaceRoot) -> bool {
        let slot = self.slots.lock().remove(root);
        match slot {
            Some(Slot::Ready(pair)) => {
                info!(root = %root, "releasing workspace resources");
                pair.server.shutdown().await;
                true
            }
            Some(Slot::Pending { .. }) => {
                debug!(root = %root, "released workspace while resources were being created");
                true
            }
            None => false,
        }
    }

    /// Release every workspace.
    pub async fn shutdown_all(&self) {
        let slots: Vec<(WorkspaceRoot, Slot)> = self.slots.lock().drain().collect();
        for (root, slot) in slots {
            if let Slot::Ready(pair) = slot {
                debug!(root = %root, "stopping asset server");
                pair.server.shutdown().await;
            }
        }
    }

    /// Whether `root` has ready or pending resources.
    pub fn contains(&self, root: &WorkspaceRoot) -> bool {
        self.slots.lock().contains_key(root)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

impl std::fmt::Debug for WorkspaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceRegistry")
            .field("workspaces", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::testing::FakeEngine;
    use std::sync::atomic::AtomicUsize;

    /// Starts real servers over fake engines and counts creations.
    #[derive(Default)]
    struct CountingFactory {
        created: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ResourceFactory for CountingFactory {
        async fn create(&self, root: &WorkspaceRoot) -> Result<ResourcePair> {
            self.created.fetch_add(1, Ordering::SeqCst);
            let engine: Arc<dyn AnalysisEngine> = Arc::new(FakeEngine::new(root.as_path()));
            let server =
                AssetServer::start(root.clone(), engine.clone(), &ServerConfig::default()).await?;
            Ok(ResourcePair::new(server, ModuleResolver::new(engine)))
        }
    }

    fn root(path: &str) -> WorkspaceRoot {
        WorkspaceRoot::new(path).unwrap()
    }

    #[tokio::test]
    async fn second_acquire_reuses_pair() {
        let factory = CountingFactory::default();
        let created = factory.created.clone();
        let registry = WorkspaceRegistry::new(factory);

        let first = registry.acquire(&root("/ws")).await.unwrap();
        let second = registry.acquire(&root("/ws")).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn release_stops_server_and_allows_recreation() {
        let factory = CountingFactory::default();
        let created = factory.created.clone();
        let registry = WorkspaceRegistry::new(factory);
        let ws = root("/ws");

        let first = registry.acquire(&ws).await.unwrap();
        assert!(registry.release(&ws).await);
        assert!(!first.server.is_running());
        assert!(!registry.contains(&ws));
        assert!(!registry.release(&ws).await);

        let second = registry.acquire(&ws).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn shutdown_all_empties_registry() {
        let registry = WorkspaceRegistry::new(CountingFactory::default());
        let a = registry.acquire(&root("/a")).await.unwrap();
        let b = registry.acquire(&root("/b")).await.unwrap();
        assert_eq!(registry.len(), 2);

        registry.shutdown_all().await;
        assert!(registry.is_empty());
        assert!(!a.server.is_running());
        assert!(!b.server.is_running());
    }

    struct PanickingFactory;

    #[async_trait]
    impl ResourceFactory for PanickingFactory {
        async fn create(&self, _root: &WorkspaceRoot) -> Result<ResourcePair> {
            panic!("factory bug");
        }
    }

    #[tokio::test]
    async fn panicking_factory_does_not_poison_entry() {
        let registry = WorkspaceRegistry::new(PanickingFactory);
        let err = registry.acquire(&root("/ws")).await.unwrap_err();
        assert!(matches!(err, IgnitionError::Startup { .. }));
        assert!(!registry.contains(&root("/ws")));
    }
}
