use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error; // Use thiserror for cleaner error definitions

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database backend error: {0}")]
    BackendError(#[from] anyhow::Error), // Wrap Anyhow errors from DB layer

    #[error("Stored deck data is corrupt: {0}")]
    DataCorruption(String),
}

// --- Web Layer Error ---

/// Terminal error for every handler. Rendered as `{ status, message }`.
#[derive(Error, Debug)]
pub enum AppError {
    /// An error that already carries the status and message to send back.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    // Configuration / Startup errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Http { status, message } if !message.is_empty() => {
                tracing::warn!(error.status = %status, error.message = %message, "Responding with error");
                (status, message)
            }
            AppError::Http { status, .. } => (status, DEFAULT_ERROR_MESSAGE.to_string()),
            other => {
                // Anything without an explicit status is a server fault
                tracing::error!(error.detail = %other, "Unhandled error");
                (StatusCode::INTERNAL_SERVER_ERROR, DEFAULT_ERROR_MESSAGE.to_string())
            }
        };

        let body = Json(ErrorBody {
            status: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}
