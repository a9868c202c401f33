//! Users command - report the owners of locally stored posts

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::args::UsersArgs;
use crate::commands::open_store;
use crate::config::AppConfig;

pub async fn execute(args: UsersArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let repository = open_store(&config, false).await?;

    let user_ids = repository
        .list_distinct_user_ids()
        .await
        .context("Failed to list user ids")?;

    tracing::debug!(count = user_ids.len(), "Loaded distinct user ids");

    if args.json {
        println!("{}", serde_json::to_string(&user_ids)?);
    } else if user_ids.is_empty() {
        println!("No posts stored");
    } else {
        for user_id in &user_ids {
            println!("{}", user_id);
        }
    }

    Ok(())
}
