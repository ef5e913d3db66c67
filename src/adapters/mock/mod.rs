//! Mock implementations for testing.
//!
//! Test doubles for the trait abstractions, so sessions can be driven
//! without network or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and streams
//! - [`InMemoryStore`] - In-memory key/value storage

pub mod http;
pub mod storage;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use storage::InMemoryStore;

use std::sync::{Mutex, MutexGuard};

/// Lock shared mock state, ignoring poisoning
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
