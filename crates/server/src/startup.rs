use std::net::SocketAddr;

use configs::{AppConfig, ServerConfig};
use tracing::{info, warn};

use crate::app::{DevApi, DevApiConfig};

/// Resolve host/port from the server config; hostnames go through DNS.
async fn resolve_bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host((server.host.as_str(), server.port))
        .await?
        .next()
        .ok_or_else(|| anyhow::anyhow!("cannot resolve {}:{}", server.host, server.port))
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the API from config and serve it until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let api = DevApi::new(DevApiConfig::from(&cfg.api)).await?;
    let addr = resolve_bind_addr(&cfg.server).await?;
    info!(%addr, resources = ?cfg.api.resources, filepath = %cfg.api.filepath.display(), "starting devapi");
    api.listen_on(addr, shutdown_signal()).await
}
