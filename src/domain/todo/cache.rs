//! Look-aside cache contract for todos

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Todo, TodoId};
use crate::domain::DomainError;

/// Outcome of a cache read that did not fail
///
/// A miss is an expected outcome and never an error. Transport and decoding
/// failures travel in the `Err` arm of the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

/// Cache of single todos and of the collection view
///
/// When the cache is disabled every write is a successful no-op and every
/// read is a `Miss`.
#[async_trait]
pub trait TodoCache: Send + Sync + Debug {
    fn is_enabled(&self) -> bool;

    async fn get(&self, id: TodoId) -> Result<CacheLookup<Todo>, DomainError>;

    /// Upserts the single-item entry for `todo.id()`
    async fn save(&self, todo: &Todo) -> Result<(), DomainError>;

    /// Removes the single-item entry; a missing entry is not an error
    async fn delete(&self, id: TodoId) -> Result<(), DomainError>;

    async fn list(&self) -> Result<CacheLookup<Vec<Todo>>, DomainError>;

    /// Overwrites the collection view wholesale
    async fn save_list(&self, todos: &[Todo]) -> Result<(), DomainError>;

    async fn delete_list(&self) -> Result<(), DomainError>;

    /// Drops every entry; administrative only
    async fn clear(&self) -> Result<(), DomainError>;

    async fn ping(&self) -> Result<(), DomainError>;
}
