//! Trait abstractions for the session's collaborators.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport (streaming POST, GET)
//! - [`KeyValueStore`] - Durable key/value storage for snapshots
//! - [`StatusSink`] - Receiver of session state updates

pub mod http;
pub mod sink;
pub mod storage;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use sink::{NoopSink, StatusSink};
pub use storage::KeyValueStore;
