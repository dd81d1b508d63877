//! Per-workspace asset server.
//!
//! Serves browser-loadable modules of one workspace under a path prefix
//! (`/_src` by default) and answers everything else with a fixed fallback.
//! Every response carries CORS headers so preview documents loaded from
//! another origin can import the modules and their dependencies.

mod handlers;
mod routes;

pub use routes::{Route, RouteTable};

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use ignition_analyzer::{AnalysisEngine, url_path};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::config::{CorsConfig, ServerConfig};
use crate::error::{IgnitionError, Result};
use crate::workspace::WorkspaceRoot;

/// Where an asset server is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServedAddress(SocketAddr);

impl ServedAddress {
    pub fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }

    pub fn host(&self) -> IpAddr {
        self.0.ip()
    }

    pub fn port(&self) -> u16 {
        self.0.port()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.0
    }

    /// `http://host:port`
    pub fn origin(&self) -> String {
        format!("http://{}", self.0)
    }

    /// Absolute URL of a served path below `prefix`.
    pub fn module_url(&self, prefix: &str, js_path: &str) -> String {
        format!("{}{}", self.origin(), url_path(prefix, js_path))
    }
}

impl fmt::Display for ServedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// State shared by all request handlers of one server.
pub(crate) struct ServerState {
    pub engine: Arc<dyn AnalysisEngine>,
    pub routes: RouteTable,
}

pub(crate) type SharedState = Arc<ServerState>;

/// A running asset server bound to one workspace root.
///
/// Dropping the server stops it; [`AssetServer::shutdown`] additionally waits
/// for in-flight requests to finish.
pub struct AssetServer {
    root: WorkspaceRoot,
    address: ServedAddress,
    routes: RouteTable,
    stop: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<std::io::Result<()>>>>,
}

impl AssetServer {
    /// Bind the listener and start serving in the background.
    ///
    /// The address is known when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`IgnitionError::InvalidConfig`] for an unusable configuration and
    /// [`IgnitionError::Server`] if the address cannot be bound.
    pub async fn start(
        root: WorkspaceRoot,
        engine: Arc<dyn AnalysisEngine>,
        config: &ServerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let port = config.port.unwrap_or(0);
        let listener = tokio::net::TcpListener::bind((config.host.as_str(), port))
            .await
            .map_err(|e| {
                IgnitionError::Server(format!("failed to bind {}:{}: {}", config.host, port, e))
            })?;
        let address = ServedAddress::new(listener.local_addr()?);

        let routes = RouteTable::new(&config.source_prefix);
        let state = Arc::new(ServerState {
            engine,
            routes: routes.clone(),
        });
        let app = build_router(state, &config.cors);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        info!(root = %root, %address, prefix = routes.source_prefix(), "asset server listening");

        Ok(Self {
            root,
            address,
            routes,
            stop: Mutex::new(Some(stop_tx)),
            task: Mutex::new(Some(task)),
        })
    }

    pub fn address(&self) -> ServedAddress {
        self.address
    }

    pub fn root(&self) -> &WorkspaceRoot {
        &self.root
    }

    pub fn source_prefix(&self) -> &str {
        self.routes.source_prefix()
    }

    /// Absolute URL at which `js_path` is served.
    pub fn module_url(&self, js_path: &str) -> String {
        self.address.module_url(self.source_prefix(), js_path)
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop accepting connections and wait for the server task to end.
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        if let Some(stop) = self.stop.lock().take() {
            let _ = stop.send(());
        }
        let Some(task) = self.task.lock().take() else {
            return;
        };

        match task.await {
            Ok(Ok(())) => debug!(root = %self.root, "asset server stopped"),
            Ok(Err(e)) => warn!(root = %self.root, error = %e, "asset server ended with an error"),
            Err(e) => warn!(root = %self.root, error = %e, "asset server task failed"),
        }
    }
}

impl fmt::Debug for AssetServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetServer")
            .field("root", &self.root)
            .field("address", &self.address)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

pub(crate) fn build_router(state: SharedState, cors: &CorsConfig) -> Router {
    Router::new()
        .fallback(handlers::handle_request)
        .layer(cors_layer(cors))
        .with_state(state)
}

/// Permissive CORS for cross-origin preview documents.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = if config.allow_credentials {
        // `*` is not allowed together with credentials
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    match config.max_age {
        Some(secs) => layer.max_age(Duration::from_secs(secs)),
        None => layer,
    }
}
