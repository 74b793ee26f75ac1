use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid ID format: {message}")]
    InvalidId { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Prefixes the error message with the step that failed, keeping the variant
    pub fn context(self, step: &str) -> Self {
        match self {
            Self::NotFound { message } => Self::not_found(format!("{}: {}", step, message)),
            Self::Validation { message } => Self::validation(format!("{}: {}", step, message)),
            Self::InvalidId { message } => Self::invalid_id(format!("{}: {}", step, message)),
            Self::Configuration { message } => {
                Self::configuration(format!("{}: {}", step, message))
            }
            Self::Internal { message } => Self::internal(format!("{}: {}", step, message)),
            Self::Storage { message } => Self::storage(format!("{}: {}", step, message)),
            Self::Cache { message } => Self::cache(format!("{}: {}", step, message)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
