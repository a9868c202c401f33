//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod serve;
pub mod users;

use anyhow::{Context, Result};
use post_sync_adapters::store::{InMemoryPostRepository, SqlitePostRepository};
use post_sync_domain::PostRepository;
use std::sync::Arc;

use crate::config::AppConfig;

/// Open the configured post store
pub(crate) async fn open_store(
    config: &AppConfig,
    in_memory: bool,
) -> Result<Arc<dyn PostRepository>> {
    if in_memory || config.store.in_memory {
        tracing::warn!("Using in-memory store, posts are lost on shutdown");
        return Ok(Arc::new(InMemoryPostRepository::new()));
    }

    let store = SqlitePostRepository::new(&config.store.database_path)
        .await
        .with_context(|| {
            format!(
                "Failed to open SQLite store at {}",
                config.store.database_path.display()
            )
        })?;

    Ok(Arc::new(store))
}
