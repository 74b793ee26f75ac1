//! Durable todo store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewTodo, Todo, TodoId, UpdateTodo};
use crate::domain::DomainError;

/// Authoritative todo storage
#[async_trait]
pub trait TodoRepository: Send + Sync + Debug {
    /// All todos, most recently updated first
    async fn list(&self) -> Result<Vec<Todo>, DomainError>;

    /// Get a todo by its ID
    async fn get(&self, id: TodoId) -> Result<Option<Todo>, DomainError>;

    /// Insert a new todo; the store assigns the id and timestamps
    async fn create(&self, todo: NewTodo) -> Result<Todo, DomainError>;

    /// Apply an update against the currently stored version
    ///
    /// Fails with `NotFound` when the id does not exist.
    async fn update(&self, update: &UpdateTodo) -> Result<Todo, DomainError>;

    /// Delete a todo, returning whether a row was removed
    async fn delete(&self, id: TodoId) -> Result<bool, DomainError>;

    /// Count stored todos
    async fn count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::todo::entity::sort_for_listing;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock todo repository for testing
    ///
    /// Records the name of every call so tests can assert which durable
    /// operations a caller issued.
    #[derive(Debug, Default)]
    pub struct MockTodoRepository {
        todos: Arc<RwLock<HashMap<TodoId, Todo>>>,
        next_id: Arc<RwLock<i64>>,
        should_fail: Arc<RwLock<bool>>,
        calls: Arc<RwLock<Vec<String>>>,
    }

    impl MockTodoRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        pub async fn calls(&self) -> Vec<String> {
            self.calls.read().await.clone()
        }

        pub async fn reset_calls(&self) {
            self.calls.write().await.clear();
        }

        async fn record(&self, call: &str) -> Result<(), DomainError> {
            self.calls.write().await.push(call.to_string());

            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TodoRepository for MockTodoRepository {
        async fn list(&self) -> Result<Vec<Todo>, DomainError> {
            self.record("list").await?;
            let mut todos: Vec<Todo> = self.todos.read().await.values().cloned().collect();
            sort_for_listing(&mut todos);
            Ok(todos)
        }

        async fn get(&self, id: TodoId) -> Result<Option<Todo>, DomainError> {
            self.record("get").await?;
            Ok(self.todos.read().await.get(&id).cloned())
        }

        async fn create(&self, todo: NewTodo) -> Result<Todo, DomainError> {
            self.record("create").await?;

            let mut next_id = self.next_id.write().await;
            *next_id += 1;

            let created = Todo::created(TodoId::new(*next_id), &todo, Utc::now());
            self.todos.write().await.insert(created.id(), created.clone());
            Ok(created)
        }

        async fn update(&self, update: &UpdateTodo) -> Result<Todo, DomainError> {
            self.record("update").await?;
            let mut todos = self.todos.write().await;

            let existing = todos.get(&update.id).ok_or_else(|| {
                DomainError::not_found(format!("Todo '{}' not found", update.id))
            })?;

            let updated = existing.apply_update(update, Utc::now());
            todos.insert(updated.id(), updated.clone());
            Ok(updated)
        }

        async fn delete(&self, id: TodoId) -> Result<bool, DomainError> {
            self.record("delete").await?;
            Ok(self.todos.write().await.remove(&id).is_some())
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.record("count").await?;
            Ok(self.todos.read().await.len())
        }
    }
}
