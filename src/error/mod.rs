//! Error handling for writeflow.
//!
//! - **Session errors**: terminal outcomes of `start()` that carry no result
//! - **Storage errors**: failures of the key/value collaborator
//! - **Error categories**: classification for retry and messaging decisions
//!
//! | Variant | Category | Retryable |
//! |---------|----------|-----------|
//! | Validation | User | No |
//! | Connection | Network / Server | Yes |
//! | Protocol | Protocol | Yes |
//! | Timeout | Network | Yes |
//! | Cancelled | Cancelled | No |
//!
//! Malformed frames never become errors; the parser drops them.

mod category;
mod session;
mod storage;

pub use category::ErrorCategory;
pub use session::SessionError;
pub use storage::StorageError;

/// Result of a session operation.
pub type SessionResult<T> = Result<T, SessionError>;
