//! Look-aside todo cache layered on a raw key/value backend

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::domain::cache::{Cache, CacheKey};
use crate::domain::todo::{CacheLookup, Todo, TodoCache, TodoId};
use crate::domain::DomainError;

/// JSON-encoded todo cache
///
/// Built without a backend the cache is disabled: writes succeed without doing
/// anything and reads always miss.
#[derive(Debug, Clone)]
pub struct LookAsideTodoCache {
    backend: Option<Arc<dyn Cache>>,
}

impl LookAsideTodoCache {
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn disabled() -> Self {
        Self { backend: None }
    }

    async fn read<V>(&self, key: CacheKey) -> Result<CacheLookup<V>, DomainError>
    where
        V: DeserializeOwned,
    {
        let Some(backend) = &self.backend else {
            return Ok(CacheLookup::Miss);
        };

        match backend.get_raw(&key.render()).await? {
            Some(data) => {
                let value = serde_json::from_str(&data).map_err(|e| {
                    DomainError::cache(format!("Failed to decode cache entry '{}': {}", key, e))
                })?;
                Ok(CacheLookup::Hit(value))
            }
            None => Ok(CacheLookup::Miss),
        }
    }

    async fn write<V>(&self, key: CacheKey, value: &V) -> Result<(), DomainError>
    where
        V: Serialize + ?Sized,
    {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let data = serde_json::to_string(value).map_err(|e| {
            DomainError::cache(format!("Failed to encode cache entry '{}': {}", key, e))
        })?;

        backend.set_raw(&key.render(), &data).await?;
        debug!(key = %key, "Saved cache entry");
        Ok(())
    }

    async fn remove(&self, key: CacheKey) -> Result<(), DomainError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let existed = backend.delete(&key.render()).await?;
        debug!(key = %key, existed, "Removed cache entry");
        Ok(())
    }
}

#[async_trait]
impl TodoCache for LookAsideTodoCache {
    fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    async fn get(&self, id: TodoId) -> Result<CacheLookup<Todo>, DomainError> {
        self.read(CacheKey::Item(id)).await
    }

    async fn save(&self, todo: &Todo) -> Result<(), DomainError> {
        self.write(CacheKey::Item(todo.id()), todo).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), DomainError> {
        self.remove(CacheKey::Item(id)).await
    }

    async fn list(&self) -> Result<CacheLookup<Vec<Todo>>, DomainError> {
        self.read(CacheKey::List).await
    }

    async fn save_list(&self, todos: &[Todo]) -> Result<(), DomainError> {
        self.write(CacheKey::List, todos).await
    }

    async fn delete_list(&self) -> Result<(), DomainError> {
        self.remove(CacheKey::List).await
    }

    async fn clear(&self) -> Result<(), DomainError> {
        match &self.backend {
            Some(backend) => backend.clear().await,
            None => Ok(()),
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        match &self.backend {
            Some(backend) => backend.ping().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{MockCache, MockCacheOp};
    use chrono::{TimeZone, Utc};

    fn todo(id: i64) -> Todo {
        Todo::restore(
            TodoId::new(id),
            format!("todo {}", id),
            Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
            None,
        )
    }

    #[tokio::test]
    async fn test_save_and_get_item() {
        let backend = Arc::new(MockCache::new());
        let cache = LookAsideTodoCache::new(backend.clone());

        cache.save(&todo(3)).await.unwrap();

        assert!(backend.contains("3"));
        assert_eq!(
            cache.get(TodoId::new(3)).await.unwrap(),
            CacheLookup::Hit(todo(3))
        );
        assert_eq!(cache.get(TodoId::new(4)).await.unwrap(), CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_list_uses_reserved_key() {
        let backend = Arc::new(MockCache::new());
        let cache = LookAsideTodoCache::new(backend.clone());

        assert_eq!(cache.list().await.unwrap(), CacheLookup::Miss);

        cache.save_list(&[todo(2), todo(1)]).await.unwrap();
        assert!(backend.contains(CacheKey::LIST));
        assert_eq!(
            cache.list().await.unwrap(),
            CacheLookup::Hit(vec![todo(2), todo(1)])
        );

        cache.delete_list().await.unwrap();
        assert!(!backend.contains(CacheKey::LIST));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_an_error() {
        let cache = LookAsideTodoCache::new(Arc::new(MockCache::new()));

        assert!(cache.delete(TodoId::new(99)).await.is_ok());
        assert!(cache.delete_list().await.is_ok());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_an_error_not_a_miss() {
        let backend = Arc::new(MockCache::new().with_raw_entry("5", "not json"));
        let cache = LookAsideTodoCache::new(backend);

        let result = cache.get(TodoId::new(5)).await;
        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error_not_a_miss() {
        let backend = Arc::new(MockCache::new());
        backend.fail_on(MockCacheOp::Get);
        let cache = LookAsideTodoCache::new(backend);

        assert!(cache.get(TodoId::new(1)).await.is_err());
        assert!(cache.list().await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_cache_misses_and_accepts_writes() {
        let cache = LookAsideTodoCache::disabled();

        assert!(!cache.is_enabled());
        cache.save(&todo(1)).await.unwrap();
        cache.save_list(&[todo(1)]).await.unwrap();

        assert_eq!(cache.get(TodoId::new(1)).await.unwrap(), CacheLookup::Miss);
        assert_eq!(cache.list().await.unwrap(), CacheLookup::Miss);
        assert!(cache.delete(TodoId::new(1)).await.is_ok());
        assert!(cache.delete_list().await.is_ok());
        assert!(cache.clear().await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let backend = Arc::new(MockCache::new());
        let cache = LookAsideTodoCache::new(backend.clone());
        cache.save(&todo(1)).await.unwrap();
        cache.save_list(&[todo(1)]).await.unwrap();

        cache.clear().await.unwrap();

        assert!(!backend.contains("1"));
        assert!(!backend.contains(CacheKey::LIST));
    }
}
