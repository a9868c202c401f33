//! Serve command - run the REST API

use anyhow::{Context, Result};
use post_sync_adapters::{external::HttpExternalApi, http_api};
use post_sync_domain::{ExternalApi, usecases::PostService};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::args::ServeArgs;
use crate::commands::open_store;
use crate::config::AppConfig;

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let bind_addr = args
        .bind
        .clone()
        .unwrap_or_else(|| config.server.bind_addr.clone());

    tracing::info!(
        bind_addr = %bind_addr,
        external_api = %config.external_api.base_url,
        in_memory = args.in_memory || config.store.in_memory,
        "Starting post-sync server"
    );

    // Build dependencies
    let repository = open_store(&config, args.in_memory).await?;

    let external_api: Arc<dyn ExternalApi> = Arc::new(
        HttpExternalApi::new(
            config.external_api.base_url.clone(),
            config.external_api.timeout(),
        )
        .context("Failed to initialize external API client")?,
    );

    let service = Arc::new(PostService::new(repository, external_api));
    let app = http_api::router(service, config.server.request_timeout());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("post-sync server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
    }
}
