//! Domain layer - entities, validation and the storage/cache contracts

pub mod cache;
pub mod error;
pub mod todo;

pub use cache::{Cache, CacheKey};
pub use error::DomainError;
pub use todo::{
    CacheLookup, NewTodo, Todo, TodoCache, TodoId, TodoRepository, UpdateTodo,
};
