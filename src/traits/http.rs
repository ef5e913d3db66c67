//! HTTP transport trait abstraction.
//!
//! The session controller only needs "submit a request, get a byte stream"
//! plus a plain GET for the health endpoint. Production uses the reqwest
//! adapter; tests use the mock adapter.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// Header names and values sent with a request.
pub type Headers = HashMap<String, String>;

/// Incrementally received response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// A fully buffered response, used for the health endpoint.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self::with_headers(status, Headers::new(), body)
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport failures, before or during the body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The service answered, but not with a 2xx
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Request cancelled")]
    Cancelled,

    /// The body broke off after the response started
    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Other(String),
}

/// Transport used by [`GenerationClient`](crate::generation::GenerationClient).
///
/// # Example
///
/// ```ignore
/// use writeflow::traits::{HttpClient, Headers};
///
/// let mut body = client
///     .post_stream("http://localhost:8000/api/v1/writing/stream", &json, &Headers::new())
///     .await?;
/// while let Some(chunk) = body.next().await {
///     decoder.push(&chunk?);
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET and buffer the whole body.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// POST a JSON body and hand back the response body as it arrives.
    ///
    /// A non-success status must be reported as [`HttpError::ServerError`]
    /// rather than as a stream.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}
