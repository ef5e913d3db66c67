//! Generation session control.
//!
//! - [`GenerationClient`]: opens the stream and drives one session at a time
//! - [`Session`]: caller-owned state, history and snapshot store
//! - [`CancelHandle`]: cancels the active session from anywhere

mod client;
mod session;
mod single_flight;

pub use client::GenerationClient;
pub use session::Session;
pub use single_flight::CancelHandle;
