//! Todo domain - records, validation, and the durable store / cache contracts

mod cache;
mod entity;
mod repository;
mod validation;

pub use cache::{CacheLookup, TodoCache};
pub use entity::{sort_for_listing, write_time, NewTodo, Todo, TodoId, UpdateTodo};
pub use repository::TodoRepository;
pub use validation::{validate_todo_title, TodoValidationError, MAX_TITLE_LENGTH};

#[cfg(test)]
pub use repository::mock::MockTodoRepository;
