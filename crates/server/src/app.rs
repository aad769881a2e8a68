use std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use store::{StorageStatus, Store};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

/// What a [`DevApi`] serves and where it keeps its data.
#[derive(Debug, Clone)]
pub struct DevApiConfig {
    pub resources: Vec<String>,
    pub filepath: PathBuf,
}

impl From<&configs::ApiConfig> for DevApiConfig {
    fn from(cfg: &configs::ApiConfig) -> Self {
        Self { resources: cfg.resources.clone(), filepath: cfg.filepath.clone() }
    }
}

/// Any origin, no credentials.
pub fn build_cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// A mock REST API: one JSON file store plus CRUD routes for each resource.
pub struct DevApi {
    store: Arc<Store>,
    router: Router,
}

impl DevApi {
    /// Open the store and bind the routes. Does not start listening.
    pub async fn new(config: DevApiConfig) -> Result<Self, StartupError> {
        configs::validate_resources(&config.resources)
            .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

        let store = Store::open(config.filepath, config.resources).await?;
        if let StorageStatus::Unavailable(reason) = store.storage_status() {
            warn!(path = %store.path().display(), %reason, "storage unavailable; changes may not persist");
        }

        let router = routes::build_router(AppState::new(Arc::clone(&store)), build_cors());
        Ok(Self { store, router })
    }

    pub fn router(&self) -> Router { self.router.clone() }

    pub fn store(&self) -> Arc<Store> { Arc::clone(&self.store) }

    pub fn storage_status(&self) -> &StorageStatus { self.store.storage_status() }

    /// Listen on all interfaces at `port` until the server fails.
    pub async fn listen(self, port: u16) -> anyhow::Result<()> {
        self.listen_on(SocketAddr::from(([0, 0, 0, 0], port)), std::future::pending()).await
    }

    /// Listen on `addr` until `shutdown` resolves.
    pub async fn listen_on<F>(self, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(%addr, "Dev API listening at http://localhost:{}", addr.port());
        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;
        info!(%addr, "Dev API stopped");
        Ok(())
    }
}
