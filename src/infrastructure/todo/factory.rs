//! Todo store factory for runtime backend selection

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::todo::TodoRepository;
use crate::domain::DomainError;
use crate::infrastructure::storage::{connect, run_todo_migrations, PostgresConfig};

use super::in_memory::InMemoryTodoRepository;
use super::postgres_repository::PostgresTodoRepository;

/// Supported durable store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// In-memory store (for testing/development)
    #[default]
    #[serde(alias = "memory", alias = "inmemory")]
    InMemory,
    /// PostgreSQL store
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::InMemory => write!(f, "in_memory"),
            StorageType::Postgres => write!(f, "postgres"),
        }
    }
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage type: {}. Valid types: in_memory, postgres",
                s
            ))),
        }
    }
}

/// Todo store configuration
#[derive(Debug, Clone)]
pub enum TodoStoreConfig {
    InMemory,
    Postgres {
        config: PostgresConfig,
        run_migrations: bool,
    },
}

impl TodoStoreConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres {
            config,
            run_migrations: true,
        }
    }

    /// Skip applying pending migrations on startup
    pub fn without_migrations(self) -> Self {
        match self {
            Self::Postgres { config, .. } => Self::Postgres {
                config,
                run_migrations: false,
            },
            other => other,
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres { .. } => StorageType::Postgres,
        }
    }
}

/// Factory for creating todo stores
#[derive(Debug)]
pub struct TodoRepositoryFactory;

impl TodoRepositoryFactory {
    pub async fn create(config: &TodoStoreConfig) -> Result<Arc<dyn TodoRepository>, DomainError> {
        match config {
            TodoStoreConfig::InMemory => {
                info!("Using in-memory todo store");
                Ok(Arc::new(InMemoryTodoRepository::new()))
            }
            TodoStoreConfig::Postgres {
                config,
                run_migrations,
            } => {
                let pool = connect(config).await?;

                if *run_migrations {
                    let applied = run_todo_migrations(&pool).await?;
                    info!(applied, "Todo schema migrations checked");
                }

                info!("Using PostgreSQL todo store");
                Ok(Arc::new(PostgresTodoRepository::new(pool)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("in-memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("PG".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert!("mysql".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_type_deserialize() {
        let parsed: StorageType = serde_json::from_str("\"in_memory\"").unwrap();
        assert_eq!(parsed, StorageType::InMemory);

        let parsed: StorageType = serde_json::from_str("\"postgresql\"").unwrap();
        assert_eq!(parsed, StorageType::Postgres);
    }

    #[test]
    fn test_store_config_storage_type() {
        assert_eq!(TodoStoreConfig::in_memory().storage_type(), StorageType::InMemory);

        let pg = TodoStoreConfig::postgres(PostgresConfig::default()).without_migrations();
        assert_eq!(pg.storage_type(), StorageType::Postgres);
        assert!(matches!(
            pg,
            TodoStoreConfig::Postgres {
                run_migrations: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_in_memory_store() {
        let repo = TodoRepositoryFactory::create(&TodoStoreConfig::in_memory())
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
