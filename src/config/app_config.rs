use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::cache::{CacheConfig, CacheType, DEFAULT_CACHE_TTL};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::storage::PostgresConfig;
use crate::infrastructure::todo::{CachePopulation, StorageType, TodoStoreConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub database: DatabaseConfig,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Durable store connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub storage: StorageType,
    /// Full connection URL; takes precedence over the discrete fields
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub run_migrations: bool,
}

/// Cache connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub backend: CacheType,
    /// Full Redis URL; takes precedence over host and port
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub key_prefix: Option<String>,
    /// Lifetime of every cache entry; bounds how long a lost invalidation lingers
    pub ttl_secs: u64,
    pub max_capacity: Option<u64>,
    pub connection_timeout_secs: u64,
    pub population: CachePopulation,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let pool = PostgresConfig::default();

        Self {
            storage: StorageType::default(),
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "todo".to_string(),
            max_connections: pool.max_connections,
            min_connections: pool.min_connections,
            connect_timeout_secs: pool.connect_timeout_secs,
            idle_timeout_secs: pool.idle_timeout_secs,
            run_migrations: true,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheType::default(),
            url: None,
            host: "localhost".to_string(),
            port: 6379,
            key_prefix: None,
            ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            max_capacity: None,
            connection_timeout_secs: 5,
            population: CachePopulation::default(),
        }
    }
}

impl DatabaseConfig {
    pub fn postgres(&self) -> PostgresConfig {
        let base = match &self.url {
            Some(url) => PostgresConfig::new(url.clone()),
            None => PostgresConfig::from_parts(
                &self.user,
                &self.password,
                &self.host,
                self.port,
                &self.name,
            ),
        };

        base.with_max_connections(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_connect_timeout(self.connect_timeout_secs)
            .with_idle_timeout(self.idle_timeout_secs)
    }

    pub fn store(&self) -> TodoStoreConfig {
        match self.storage {
            StorageType::InMemory => TodoStoreConfig::in_memory(),
            StorageType::Postgres if self.run_migrations => {
                TodoStoreConfig::postgres(self.postgres())
            }
            StorageType::Postgres => TodoStoreConfig::postgres(self.postgres()).without_migrations(),
        }
    }
}

impl CacheSettings {
    pub fn redis_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("redis://{}:{}", self.host, self.port))
    }

    pub fn cache_config(&self) -> CacheConfig {
        let mut config = match self.backend {
            CacheType::InMemory => CacheConfig::in_memory(),
            CacheType::Redis => CacheConfig::redis(self.redis_url()),
        };

        config.enabled = self.enabled;
        config.connection_timeout = Duration::from_secs(self.connection_timeout_secs);
        config = config.with_ttl(Duration::from_secs(self.ttl_secs.max(1)));

        if let Some(prefix) = &self.key_prefix {
            config = config.with_key_prefix(prefix.clone());
        }

        if let Some(capacity) = self.max_capacity {
            config = config.with_max_capacity(capacity);
        }

        config
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
