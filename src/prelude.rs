//! Prelude module for convenient imports.
//!
//! ```ignore
//! use writeflow::prelude::*;
//! ```

// Session control
pub use crate::config::ClientConfig;
pub use crate::generation::{CancelHandle, GenerationClient, Session};

// Model types
pub use crate::models::{
    GenerationMode, GenerationResult, GenerationStatus, RequestPayload, StageId, WritingContext,
    WritingRequirements, WritingType,
};

// State
pub use crate::state::{History, SessionState};

// Errors
pub use crate::error::{ErrorCategory, SessionError, SessionResult};

// Collaborator traits
pub use crate::traits::{HttpClient, KeyValueStore, StatusSink};
