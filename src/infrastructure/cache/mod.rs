//! Cache backends and the look-aside todo cache

mod factory;
mod in_memory;
mod redis;
mod todo_cache;

use std::time::Duration;

pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use redis::{RedisCache, RedisCacheConfig};
pub use todo_cache::LookAsideTodoCache;

/// Upper bound on how long an entry outlives a lost invalidation
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
