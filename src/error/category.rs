//! Error category classification.
//!
//! Categories drive retry policy and user messaging for terminal session
//! outcomes.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout. Transient, retry with backoff.
    Network,

    /// Service answered with an error status. Retry after a delay.
    Server,

    /// Stream ended without a terminal event. Safe to retry.
    Protocol,

    /// Local precondition failed; fix the input before retrying.
    User,

    /// Caller-initiated abort. Not a failure.
    Cancelled,

    /// Local storage or filesystem problem.
    System,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::Server | ErrorCategory::Protocol
        )
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::User => "user",
            ErrorCategory::Cancelled => "cancelled",
            ErrorCategory::System => "system",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the writing service is reachable and try again",
            ErrorCategory::Server => "The service may be experiencing issues. Please try again later",
            ErrorCategory::Protocol => "The generation did not finish. It is safe to submit it again",
            ErrorCategory::User => "Please check your request and try again",
            ErrorCategory::Cancelled => "Submit the request again when ready",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
