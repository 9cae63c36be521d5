use rusqlite;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unknown mood: {0}")]
    UnknownMood(String),

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<BoxedSource>,
        details: Option<JsonValue>,
    },

    #[error("database error: {message}")]
    Database { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn unknown_mood(key: impl Into<String>) -> Self {
        let key = key.into();
        error!(target: "app::catalog", mood = %key, "unknown mood key");
        AppError::UnknownMood(key)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        warn!(target: "app::habits", %resource, "resource not found");
        AppError::NotFound { resource }
    }

    /// Wraps a storage failure, keeping the underlying error as the source.
    pub fn persistence(message: impl Into<String>, cause: impl Into<BoxedSource>) -> Self {
        let message = message.into();
        let cause = cause.into();
        error!(target: "app::habits", %message, cause = %cause, "persistence error");
        AppError::Persistence {
            message,
            source: Some(cause),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            source: None,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            source: None,
            details: Some(details),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::db", %message, "database error");
        AppError::Database { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, AppError::Persistence { .. })
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        error!(target: "app::db", error = ?error, "sqlite error");
        AppError::database(error.to_string())
    }
}
