//! Todo Cache API
//!
//! A todo service that keeps PostgreSQL authoritative and serves reads
//! through a look-aside cache (Redis or in-process):
//! - Cache-first reads that fill the cache on a miss
//! - Writes that invalidate the cached list before touching the database
//! - A disabled cache that degrades to plain database access

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use infrastructure::cache::CacheFactory;
use infrastructure::todo::{TodoRepositoryFactory, TodoService};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let store = config.database.store();
    info!("Storage backend: {}", store.storage_type());
    let repository = TodoRepositoryFactory::create(&store).await?;

    let cache = CacheFactory::new()
        .create_todo_cache(&config.cache.cache_config())
        .await?;

    let service = TodoService::new(repository, cache).with_population(config.cache.population);
    info!(population = ?config.cache.population, "Todo service ready");

    Ok(AppState::new(Arc::new(service)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::todo::NewTodo;

    #[tokio::test]
    async fn test_default_state_runs_without_external_services() {
        let state = create_app_state().await.unwrap();

        assert!(state.todo_service.cache_enabled());

        let created = state
            .todo_service
            .create(NewTodo::new("buy milk", false))
            .await
            .unwrap();
        assert_eq!(state.todo_service.get(created.id()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_state_with_cache_disabled() {
        let mut config = AppConfig::default();
        config.cache.enabled = false;

        let state = create_app_state_with_config(&config).await.unwrap();

        assert!(!state.todo_service.cache_enabled());
        assert!(state.todo_service.list().await.unwrap().is_empty());
    }
}
