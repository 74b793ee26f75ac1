//! Todo endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::todo::{NewTodo, Todo, TodoId, UpdateTodo};

/// Body accepted when updating a todo
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoApiRequest {
    pub title: String,
    #[serde(default)]
    pub complete: bool,
}

/// GET /api/v1/todo
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    debug!("Listing todos");

    let todos = state.todo_service.list().await?;
    Ok(Json(todos))
}

/// POST /api/v1/todo
pub async fn create_todo(
    State(state): State<AppState>,
    Json(request): Json<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.todo_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /api/v1/todo/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::parse(&id)?;
    debug!(id = %id, "Getting todo");

    let todo = state.todo_service.get(id).await?;
    Ok(Json(todo))
}

/// PUT|POST /api/v1/todo/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTodoApiRequest>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::parse(&id)?;

    let todo = state
        .todo_service
        .update(UpdateTodo::new(id, request.title, request.complete))
        .await?;
    Ok(Json(todo))
}

/// DELETE /api/v1/todo/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TodoId::parse(&id)?;

    state.todo_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
