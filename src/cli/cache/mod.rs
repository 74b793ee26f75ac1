//! Clear-cache command - drops every cached todo entry

use anyhow::Context;
use tracing::{info, warn};

use crate::infrastructure::cache::{CacheFactory, CacheType};

/// Clear the configured cache backend
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let cache_config = config.cache.cache_config();

    if !cache_config.enabled {
        warn!("Cache is disabled in configuration, nothing to clear");
        return Ok(());
    }

    if cache_config.cache_type == CacheType::InMemory {
        warn!("In-memory cache lives inside the serving process, nothing to clear from here");
        return Ok(());
    }

    let cache = CacheFactory::new()
        .create_todo_cache(&cache_config)
        .await
        .context("failed to connect to the cache")?;

    cache.clear().await?;
    info!(backend = %cache_config.cache_type, "Cache cleared");

    Ok(())
}
