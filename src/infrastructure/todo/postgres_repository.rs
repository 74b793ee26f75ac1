//! PostgreSQL todo repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::todo::{write_time, NewTodo, Todo, TodoId, TodoRepository, UpdateTodo};
use crate::domain::DomainError;

/// PostgreSQL implementation of TodoRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, updated, completed
            FROM todo
            ORDER BY updated DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list todos: {}", e)))?;

        rows.iter().map(row_to_todo).collect()
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, updated, completed
            FROM todo
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get todo: {}", e)))?;

        row.as_ref().map(row_to_todo).transpose()
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, DomainError> {
        let now = write_time(None, Utc::now());
        let completed = todo.complete.then_some(now);

        let row = sqlx::query(
            r#"
            INSERT INTO todo (title, updated, completed)
            VALUES ($1, $2, $3)
            RETURNING id, title, updated, completed
            "#,
        )
        .bind(&todo.title)
        .bind(now)
        .bind(completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create todo: {}", e)))?;

        row_to_todo(&row)
    }

    async fn update(&self, update: &UpdateTodo) -> Result<Todo, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin update: {}", e)))?;

        // Lock the row so the transition is computed against what we overwrite
        let existing = sqlx::query(
            r#"
            SELECT id, title, updated, completed
            FROM todo
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(update.id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to read todo for update: {}", e)))?
        .ok_or_else(|| DomainError::not_found(format!("Todo '{}' not found", update.id)))?;

        let next = row_to_todo(&existing)?.apply_update(update, Utc::now());

        let row = sqlx::query(
            r#"
            UPDATE todo
            SET title = $2, updated = $3, completed = $4
            WHERE id = $1
            RETURNING id, title, updated, completed
            "#,
        )
        .bind(update.id.value())
        .bind(next.title())
        .bind(next.updated())
        .bind(next.completed())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update todo: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit update: {}", e)))?;

        row_to_todo(&row)
    }

    async fn delete(&self, id: TodoId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete todo: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count todos: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_todo(row: &sqlx::postgres::PgRow) -> Result<Todo, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode todo row: {}", e));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let title: String = row.try_get("title").map_err(decode)?;
    let updated: DateTime<Utc> = row.try_get("updated").map_err(decode)?;
    let completed: Option<DateTime<Utc>> = row.try_get("completed").map_err(decode)?;

    Ok(Todo::restore(TodoId::new(id), title, updated, completed))
}
