//! In-memory todo repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::todo::{sort_for_listing, NewTodo, Todo, TodoId, TodoRepository, UpdateTodo};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct State {
    todos: HashMap<TodoId, Todo>,
    last_id: i64,
}

/// Process-local todo store for development and tests
///
/// Ids are assigned from a counter that never reuses a value, matching the
/// behavior of a database sequence.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    state: RwLock<State>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, DomainError> {
        let mut todos: Vec<Todo> = self.state.read().await.todos.values().cloned().collect();
        sort_for_listing(&mut todos);
        Ok(todos)
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>, DomainError> {
        Ok(self.state.read().await.todos.get(&id).cloned())
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, DomainError> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let created = Todo::created(TodoId::new(state.last_id), &todo, Utc::now());
        state.todos.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn update(&self, update: &UpdateTodo) -> Result<Todo, DomainError> {
        let mut state = self.state.write().await;

        let existing = state
            .todos
            .get(&update.id)
            .ok_or_else(|| DomainError::not_found(format!("Todo '{}' not found", update.id)))?;

        let next = existing.apply_update(update, Utc::now());
        state.todos.insert(next.id(), next.clone());
        Ok(next)
    }

    async fn delete(&self, id: TodoId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.todos.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.state.read().await.todos.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = InMemoryTodoRepository::new();

        let a = repo.create(NewTodo::new("a", false)).await.unwrap();
        let b = repo.create(NewTodo::new("b", true)).await.unwrap();

        assert_eq!(a.id(), TodoId::new(1));
        assert_eq!(b.id(), TodoId::new(2));
        assert!(!a.is_complete());
        assert!(b.is_complete());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryTodoRepository::new();

        let a = repo.create(NewTodo::new("a", false)).await.unwrap();
        assert!(repo.delete(a.id()).await.unwrap());

        let b = repo.create(NewTodo::new("b", false)).await.unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryTodoRepository::new();

        let result = repo.update(&UpdateTodo::new(TodoId::new(5), "x", false)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_updated_strictly_increases() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(NewTodo::new("a", false)).await.unwrap();

        let mut previous = created.updated();
        for i in 0..5 {
            let next = repo
                .update(&UpdateTodo::new(created.id(), format!("a{}", i), i % 2 == 0))
                .await
                .unwrap();
            assert!(next.updated() > previous);
            previous = next.updated();
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_updated_desc() {
        let repo = InMemoryTodoRepository::new();
        let a = repo.create(NewTodo::new("a", false)).await.unwrap();
        let b = repo.create(NewTodo::new("b", false)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        repo.update(&UpdateTodo::new(a.id(), "a2", false)).await.unwrap();

        let ids: Vec<TodoId> = repo.list().await.unwrap().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_is_harmless() {
        let repo = InMemoryTodoRepository::new();
        repo.create(NewTodo::new("a", false)).await.unwrap();

        assert!(!repo.delete(TodoId::new(42)).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
