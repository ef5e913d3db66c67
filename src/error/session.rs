//! Terminal outcomes of a generation session that are not a result.
//!
//! A completion carrying `status: failed` is not represented here; it resolves
//! normally with the failed [`GenerationResult`](crate::models::GenerationResult).

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Why `start()` produced no result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Local precondition failed; the request was never sent.
    #[error("Invalid request field '{field}': {message}")]
    Validation { field: String, message: String },

    /// The stream could not be established, or broke mid-flight.
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        /// HTTP status when the service answered with a non-success code
        status: Option<u16>,
    },

    /// The stream ended without a terminal event.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// The caller aborted the session.
    #[error("Generation cancelled")]
    Cancelled,

    /// No data arrived within the idle timeout.
    #[error("Stream timeout after {duration_secs} seconds")]
    Timeout { duration_secs: u64 },
}

impl SessionError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        SessionError::Connection {
            message: message.into(),
            status: None,
        }
    }

    pub fn no_result() -> Self {
        SessionError::Protocol {
            message: "no result received".to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::Validation { .. } => ErrorCategory::User,
            SessionError::Connection {
                status: Some(status),
                ..
            } if *status >= 500 => ErrorCategory::Server,
            SessionError::Connection {
                status: Some(_), ..
            } => ErrorCategory::User,
            SessionError::Connection { .. } | SessionError::Timeout { .. } => {
                ErrorCategory::Network
            }
            SessionError::Protocol { .. } => ErrorCategory::Protocol,
            SessionError::Cancelled => ErrorCategory::Cancelled,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::Validation { .. } => "E_SESSION_INVALID",
            SessionError::Connection { .. } => "E_SESSION_CONN",
            SessionError::Protocol { .. } => "E_SESSION_PROTOCOL",
            SessionError::Cancelled => "E_SESSION_CANCELLED",
            SessionError::Timeout { .. } => "E_SESSION_TIMEOUT",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation { field, message } => {
                format!("The request is invalid ({} {}).", field, message)
            }
            SessionError::Connection {
                status: Some(status),
                message,
            } => format!("The writing service rejected the request ({}): {}", status, message),
            SessionError::Connection { .. } => {
                "Could not reach the writing service.".to_string()
            }
            SessionError::Protocol { .. } => {
                "The generation ended before a result was received.".to_string()
            }
            SessionError::Cancelled => "Generation was cancelled.".to_string(),
            SessionError::Timeout { duration_secs } => format!(
                "No progress from the writing service for {} seconds.",
                duration_secs
            ),
        }
    }
}

impl From<HttpError> for SessionError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => SessionError::Connection {
                message,
                status: Some(status),
            },
            HttpError::Cancelled => SessionError::Cancelled,
            other => SessionError::connection(other.to_string()),
        }
    }
}
