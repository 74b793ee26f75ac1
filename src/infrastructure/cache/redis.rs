//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::DEFAULT_CACHE_TTL;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Expiry applied to every write, rounded up to whole seconds
    pub ttl: Duration,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            ttl: DEFAULT_CACHE_TTL,
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }
}

/// Redis cache backend
///
/// Every write is a single `SET .. EX`, so no entry exists without an expiry.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects and verifies the server answers
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(
            config.connection_timeout,
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| {
            DomainError::cache(format!(
                "Timed out connecting to Redis after {:?}",
                config.connection_timeout
            ))
        })?
        .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        let cache = Self { connection, config };
        cache.ping().await?;

        tracing::info!(url = %cache.config.url, "Redis cache initialized");
        Ok(cache)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.config.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let prefixed_key = self.config.prefix_key(key);
        let mut conn = self.connection.clone();

        let _: () = conn
            .set_ex(&prefixed_key, value, self.config.ttl_secs())
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.config.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        // With a prefix only our own keys go; otherwise the whole database
        if self.config.key_prefix.is_none() {
            redis::cmd("FLUSHDB")
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to flush database: {}", e)))?;
            return Ok(());
        }

        let pattern = self.config.prefix_key("*");
        let mut cursor = 0u64;

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!("Failed to scan keys with pattern '{}': {}", pattern, e))
                })?;

            if !keys.is_empty() {
                let _: i32 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;
            }

            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance
    // Run with: cargo test -- --ignored

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379")
            .with_key_prefix("todo-test")
            .with_ttl(Duration::from_secs(60))
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_get_delete() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache.set_raw("1", "{\"id\":1}").await.unwrap();
        assert_eq!(
            cache.get_raw("1").await.unwrap(),
            Some("{\"id\":1}".to_string())
        );

        assert!(cache.delete("1").await.unwrap());
        assert!(cache.get_raw("1").await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_clear_only_prefixed_keys() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let other = RedisCache::new(RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("other"))
            .await
            .unwrap();

        cache.set_raw("__list__", "[]").await.unwrap();
        other.set_raw("__list__", "[]").await.unwrap();

        cache.clear().await.unwrap();

        assert!(cache.get_raw("__list__").await.unwrap().is_none());
        assert!(other.get_raw("__list__").await.unwrap().is_some());

        other.clear().await.unwrap();
    }

    #[test]
    fn test_key_prefix() {
        let config = RedisCacheConfig::new("redis://localhost").with_key_prefix("todo");
        assert_eq!(config.prefix_key("7"), "todo:7");
        assert_eq!(config.prefix_key("__list__"), "todo:__list__");

        let config = RedisCacheConfig::new("redis://localhost");
        assert_eq!(config.prefix_key("7"), "7");
    }

    #[test]
    fn test_ttl_seconds() {
        let config = RedisCacheConfig::new("redis://localhost");
        assert_eq!(config.ttl, DEFAULT_CACHE_TTL);
        assert_eq!(config.ttl_secs(), 300);

        let config = config.with_ttl(Duration::from_millis(10));
        assert_eq!(config.ttl_secs(), 1);

        let config = config.with_ttl(Duration::from_secs(u64::MAX));
        assert_eq!(config.ttl_secs(), u64::MAX);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_write_carries_expiry() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        cache.set_raw("ttl", "x").await.unwrap();

        let mut conn = cache.connection.clone();
        let remaining: i64 = conn.ttl("todo-test:ttl").await.unwrap();
        assert!(remaining > 0 && remaining <= 60);

        cache.delete("ttl").await.unwrap();
    }
}
