//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::todo::TodoService;

/// Application state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub todo_service: Arc<TodoService>,
}

impl AppState {
    pub fn new(todo_service: Arc<TodoService>) -> Self {
        Self { todo_service }
    }
}
