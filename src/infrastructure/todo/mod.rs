//! Todo infrastructure - durable stores and the cache-aside service

mod factory;
mod in_memory;
mod postgres_repository;
mod service;

pub use factory::{StorageType, TodoRepositoryFactory, TodoStoreConfig};
pub use in_memory::InMemoryTodoRepository;
pub use postgres_repository::PostgresTodoRepository;
pub use service::{CachePopulation, TodoService};
