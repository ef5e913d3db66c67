//! Observable session state.
//!
//! - [`SessionState`]: progress state machine for one generation session
//! - [`History`]: bounded most-recent-first list of finished results

pub mod history;
pub mod session;

pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use session::{SessionState, Transition, CANCELLED_MESSAGE, CONNECTING_MESSAGE};
