//! Todo validation

use thiserror::Error;

/// Errors that can occur during todo validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TodoValidationError {
    #[error("Todo title cannot be empty")]
    EmptyTitle,

    #[error("Todo title cannot exceed {0} characters")]
    TitleTooLong(usize),
}

pub const MAX_TITLE_LENGTH: usize = 500;

/// Validate a todo title
pub fn validate_todo_title(title: &str) -> Result<(), TodoValidationError> {
    if title.trim().is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(TodoValidationError::TitleTooLong(MAX_TITLE_LENGTH));
    }

    Ok(())
}
