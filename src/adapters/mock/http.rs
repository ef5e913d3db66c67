//! Mock HTTP client for testing.
//!
//! Serves scripted bodies and streams, and keeps every request it was given
//! so tests can assert on what the session sent.

use async_trait::async_trait;
use bytes::Bytes;
use futures::future;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// One request as the mock received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// `GET` or `POST`
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// JSON body of a `POST`
    pub body: Option<String>,
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail before any body is returned
    Error(HttpError),
    /// Stream the chunks, then close cleanly
    Stream(Vec<Bytes>),
    /// Stream the chunks, then yield an error
    StreamThenError(Vec<Bytes>, HttpError),
    /// Stream the chunks, then stay open without sending anything
    StreamThenHang(Vec<Bytes>),
    /// Accept the request and never answer it
    NoResponse,
}

impl MockResponse {
    /// Stream response from text chunks
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(chunks.into_iter().map(|c| Bytes::from(c.into())).collect())
    }

    /// Buffered JSON response with the given status
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }

    async fn into_stream(self) -> Result<ByteStream, HttpError> {
        fn body(chunks: Vec<Bytes>) -> stream::Iter<std::vec::IntoIter<Result<Bytes, HttpError>>> {
            stream::iter(chunks.into_iter().map(Ok).collect::<Vec<_>>())
        }

        match self {
            MockResponse::Stream(chunks) => Ok(Box::pin(body(chunks))),
            MockResponse::StreamThenError(chunks, err) => {
                Ok(Box::pin(body(chunks).chain(stream::once(async move { Err(err) }))))
            }
            MockResponse::StreamThenHang(chunks) => Ok(Box::pin(body(chunks).chain(stream::pending()))),
            MockResponse::Success(response) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text().unwrap_or_default(),
                })
            }
            MockResponse::Success(_) => Err(HttpError::Other(
                "buffered response scripted for a stream request".to_string(),
            )),
            MockResponse::Error(err) => Err(err),
            MockResponse::NoResponse => future::pending().await,
        }
    }
}

#[derive(Debug, Default)]
struct Routes {
    /// Consumed in order, whatever the URL
    queued: VecDeque<MockResponse>,
    /// Keyed by exact URL or URL prefix
    by_url: HashMap<String, MockResponse>,
    fallback: Option<MockResponse>,
    requests: Vec<RecordedRequest>,
}

impl Routes {
    fn answer(&mut self, url: &str) -> Option<MockResponse> {
        if let Some(next) = self.queued.pop_front() {
            return Some(next);
        }
        if let Some(exact) = self.by_url.get(url) {
            return Some(exact.clone());
        }
        self.by_url
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.fallback.clone())
    }
}

/// Scripted [`HttpClient`].
///
/// Lookup order is the one-shot queue, then exact URL, then URL prefix,
/// then the default. Clones share the same script and request log.
///
/// # Example
///
/// ```ignore
/// use writeflow::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:8000/api/v1/writing/stream",
///     MockResponse::chunks(["data: {\"stage\":\"write\",\"progress\":45,\"message\":\"Drafting\"}\n"]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    routes: Arc<Mutex<Routes>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests to this URL, or any URL starting with it.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.routes).by_url.insert(url.to_string(), response);
    }

    /// Answer the next unanswered request with this, whatever its URL.
    pub fn push_response(&self, response: MockResponse) {
        lock(&self.routes).queued.push_back(response);
    }

    pub fn set_default_response(&self, response: MockResponse) {
        lock(&self.routes).fallback = Some(response);
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.routes).requests.clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.routes).requests.len()
    }

    pub fn clear_requests(&self) {
        lock(&self.routes).requests.clear();
    }

    /// Forget every scripted response, including the default.
    pub fn clear_responses(&self) {
        let mut routes = lock(&self.routes);
        routes.queued.clear();
        routes.by_url.clear();
        routes.fallback = None;
    }

    fn handle(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<&str>,
    ) -> Result<MockResponse, HttpError> {
        let mut routes = lock(&self.routes);
        routes.requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        });
        routes
            .answer(url)
            .ok_or_else(|| HttpError::Other(format!("no mock response for {}", url)))
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        match self.handle("GET", url, headers, None)? {
            MockResponse::Success(response) => Ok(response),
            MockResponse::Error(err) => Err(err),
            MockResponse::NoResponse => future::pending().await,
            _ => Err(HttpError::Other(
                "stream scripted for a buffered request".to_string(),
            )),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.handle("POST", url, headers, Some(body))?
            .into_stream()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM_URL: &str = "http://writer.test/api/v1/writing/stream";

    async fn post(client: &MockHttpClient) -> Vec<Result<Bytes, HttpError>> {
        client
            .post_stream(STREAM_URL, "{}", &Headers::new())
            .await
            .unwrap()
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_health_get_is_recorded() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://writer.test/api/v1/health",
            MockResponse::json(200, &serde_json::json!({"status": "healthy"})),
        );

        let response = client
            .get("http://writer.test/api/v1/health", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_stream_chunks_in_order() {
        let client = MockHttpClient::new();
        client.set_response(STREAM_URL, MockResponse::chunks(["a", "b", "c"]));

        let chunks: Vec<Bytes> = post(&client).await.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(chunks, vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")]);

        let requests = client.get_requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].body.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::StreamThenError(
            vec![Bytes::from("a")],
            HttpError::Io("reset".to_string()),
        ));

        let items = post(&client).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], Err(HttpError::Io("reset".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_then_hang() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::StreamThenHang(vec![Bytes::from("a")]));

        let mut stream = client
            .post_stream(STREAM_URL, "{}", &Headers::new())
            .await
            .unwrap();
        assert!(stream.next().await.is_some());

        let next = tokio::time::timeout(std::time::Duration::from_secs(60), stream.next()).await;
        assert!(next.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_response_never_opens() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::NoResponse);

        let headers = Headers::new();
        let open = client.post_stream(STREAM_URL, "{}", &headers);
        let result = tokio::time::timeout(std::time::Duration::from_secs(3600), open).await;
        assert!(result.is_err());
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_error_status_on_stream() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::json(
            503,
            &serde_json::json!({"detail": "unavailable"}),
        ));

        let result = client.post_stream(STREAM_URL, "{}", &Headers::new()).await;
        assert!(matches!(
            result,
            Err(HttpError::ServerError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_queue_before_routes() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::chunks(["default"]));
        client.push_response(MockResponse::chunks(["first"]));

        assert_eq!(post(&client).await[0], Ok(Bytes::from("first")));
        assert_eq!(post(&client).await[0], Ok(Bytes::from("default")));
        assert_eq!(client.request_count(), 2);
    }

    #[tokio::test]
    async fn test_prefix_route() {
        let client = MockHttpClient::new();
        client.set_response("http://writer.test/api", MockResponse::chunks(["x"]));

        assert_eq!(post(&client).await, vec![Ok(Bytes::from("x"))]);
    }

    #[tokio::test]
    async fn test_unscripted_and_cleared() {
        let client = MockHttpClient::new();
        client.set_response(STREAM_URL, MockResponse::chunks(["x"]));
        client.clear_responses();

        let result = client.post_stream(STREAM_URL, "{}", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
        assert_eq!(client.request_count(), 1);

        client.clear_requests();
        assert!(client.get_requests().is_empty());
    }
}
