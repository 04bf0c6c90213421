// src/error/types.rs
use crate::domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No channel binding configured for project tag '{tag}'")]
    UnknownProject { tag: String },

    #[error("{service} error: {message}")]
    ExternalService { service: String, message: String },

    #[error("Queue item already exists for '{identifier}' in project '{project}'")]
    DuplicateQueueItem { identifier: String, project: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// Wrap a collaborator failure, tagging the service that produced it.
    pub fn external(service: &str, err: impl std::fmt::Display) -> Self {
        AppError::ExternalService {
            service: service.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
