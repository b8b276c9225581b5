//! Transport-level errors for the API client.
//!
//! These describe what happened on the wire. Turning them into user-facing
//! messages (pattern-matching rejection bodies, session expiry) is the job of
//! the services layer.

use backbox_core::{AppError, RejectionCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("API request failed with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        /// `message` field of the JSON error body, when there was one.
        message: Option<String>,
    },

    /// The request was sent but no response came back.
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    Request(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Server-supplied message, if the error carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else {
            ApiError::Unreachable(err.to_string())
        }
    }
}

/// Generic mapping used where no operation-specific rules apply.
impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { status, message } => AppError::Rejected {
                status,
                category: RejectionCategory::Other,
                message: message.unwrap_or_else(|| "Request failed.".to_string()),
            },
            ApiError::Unreachable(_) => AppError::Unreachable,
            ApiError::Io(e) => AppError::Storage(format!("IO error: {}", e)),
            ApiError::Decode(detail) | ApiError::Request(detail) => {
                AppError::Unexpected(detail)
            }
        }
    }
}
