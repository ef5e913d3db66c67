//! Stream session controller.
//!
//! One `start()` call is one request/response cycle: validate, open the
//! stream, feed chunks through the decoder and parser, apply each event to
//! the session state, and resolve with the completion's result or reject
//! with a [`SessionError`].

use bytes::Bytes;
use futures_util::StreamExt;
use tokio::time::{sleep_until, timeout_at, Instant};
use tokio_util::sync::CancellationToken;

use super::session::Session;
use super::single_flight::CancelHandle;
use crate::config::ClientConfig;
use crate::error::{SessionError, SessionResult};
use crate::models::{GenerationResult, HealthReport, RequestPayload};
use crate::sse::{parse_frame, FrameDecoder};
use crate::state::{Transition, CANCELLED_MESSAGE};
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, KeyValueStore, StatusSink};

/// One read from the response body
enum ChunkRead {
    Chunk(Bytes),
    Failed(HttpError),
    Closed,
    Idle,
}

/// How the read loop ended
enum LoopEnd {
    Completed(GenerationResult),
    Closed,
    Failed(SessionError),
}

/// Client for the writing service's generation stream.
///
/// # Example
///
/// ```ignore
/// use writeflow::adapters::{FileKeyValueStore, ReqwestHttpClient};
/// use writeflow::config::ClientConfig;
/// use writeflow::generation::{GenerationClient, Session};
///
/// let config = ClientConfig::from_env();
/// let client = GenerationClient::new(ReqwestHttpClient::new(), config.clone());
/// let mut session = Session::restore(FileKeyValueStore::default_location()?, &config).await;
///
/// let result = client
///     .start(&request, &mut session, &mut |state: &SessionState| {
///         println!("{} {}%", state.current_stage, state.current_progress);
///     })
///     .await?;
/// ```
pub struct GenerationClient<H: HttpClient> {
    http: H,
    config: ClientConfig,
    single_flight: CancelHandle,
}

impl<H: HttpClient> GenerationClient<H> {
    pub fn new(http: H, config: ClientConfig) -> Self {
        Self {
            http,
            config,
            single_flight: CancelHandle::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// Abort the in-flight session, if any.
    ///
    /// The pending `start()` rejects with [`SessionError::Cancelled`].
    pub fn cancel(&self) -> bool {
        self.single_flight.cancel()
    }

    pub fn is_active(&self) -> bool {
        self.single_flight.is_active()
    }

    /// Handle for cancelling from another task (signal handler, UI).
    pub fn cancel_handle(&self) -> CancelHandle {
        self.single_flight.clone()
    }

    /// Query the service health endpoint.
    pub async fn health_check(&self) -> SessionResult<HealthReport> {
        let url = self.config.health_url();
        let response = self.http.get(&url, &json_headers()).await?;

        if !response.is_success() {
            return Err(SessionError::Connection {
                message: response
                    .text()
                    .unwrap_or_else(|_| "Health check failed".to_string()),
                status: Some(response.status),
            });
        }

        response.json().map_err(|e| SessionError::Protocol {
            message: format!("invalid health report: {}", e),
        })
    }

    /// Run one generation session to completion.
    ///
    /// The sink is called once for the open transition, then once per
    /// applied event, or once with the failed state on cancellation or a
    /// transport failure. It is never called after this returns.
    ///
    /// The configured idle timeout bounds the wait for the response head and
    /// each wait for the next chunk.
    pub async fn start<S, K>(
        &self,
        request: &RequestPayload,
        session: &mut Session<S>,
        sink: &mut K,
    ) -> SessionResult<GenerationResult>
    where
        S: KeyValueStore,
        K: StatusSink + ?Sized,
    {
        request.validate()?;
        let body = serde_json::to_string(request)
            .map_err(|e| SessionError::validation("request", e.to_string()))?;

        let guard = self.single_flight.begin();
        let token = guard.token().clone();

        session.mark_fresh();
        session.state.begin();
        sink.on_state(&session.state);
        session.snapshots.save(&session.state, &session.history).await;

        tracing::info!(
            session = guard.id(),
            session_id = %session.state.session_id,
            writing_type = %request.writing_type,
            "Starting generation"
        );

        let url = self.config.stream_url();
        let headers = stream_headers();
        let opened = tokio::select! {
            biased;
            _ = token.cancelled() => Err(SessionError::Cancelled),
            opened = self.open_stream(&url, &body, &headers) => opened,
        };

        let end = match opened {
            Ok(stream) => self.consume(stream, &token, session, sink).await,
            Err(err) => LoopEnd::Failed(err),
        };

        match end {
            LoopEnd::Completed(result) => {
                session.history.push_front(result.clone());
                session.persist().await;
                tracing::info!(
                    request_id = %result.request_id,
                    status = ?result.status,
                    iterations = result.iterations,
                    "Generation finished"
                );
                Ok(result)
            }
            LoopEnd::Closed => {
                session.persist().await;
                tracing::warn!(
                    stage = %session.state.current_stage,
                    "Stream closed without a result"
                );
                Err(SessionError::no_result())
            }
            LoopEnd::Failed(err) => {
                let message = match &err {
                    SessionError::Cancelled => CANCELLED_MESSAGE.to_string(),
                    other => other.to_string(),
                };
                if session.state.fail(message) {
                    sink.on_state(&session.state);
                }
                // The newer session owns the stored snapshot from here on
                let superseded = matches!(err, SessionError::Cancelled)
                    && self.single_flight.is_superseded(guard.id());
                if superseded {
                    session.snapshots.discard_pending();
                } else {
                    session.persist().await;
                }
                tracing::warn!(code = err.error_code(), error = %err, "Generation aborted");
                Err(err)
            }
        }
    }

    /// Pull loop: one chunk at a time, every complete line applied in order.
    /// A coalesced snapshot is written once its debounce window ends, even
    /// while the stream is quiet.
    async fn consume<S, K>(
        &self,
        mut stream: ByteStream,
        token: &CancellationToken,
        session: &mut Session<S>,
        sink: &mut K,
    ) -> LoopEnd
    where
        S: KeyValueStore,
        K: StatusSink + ?Sized,
    {
        let mut decoder = FrameDecoder::new();

        loop {
            let idle_at = self.config.idle_timeout.map(|limit| Instant::now() + limit);
            let read = loop {
                let flush_at = session.snapshots.flush_due_at();
                let flush_wait = sleep_until(flush_at.unwrap_or_else(Instant::now));
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return LoopEnd::Failed(SessionError::Cancelled),
                    _ = flush_wait, if flush_at.is_some() => {
                        session.snapshots.flush().await;
                    }
                    read = read_chunk(&mut stream, idle_at) => break read,
                }
            };

            let chunk = match read {
                ChunkRead::Chunk(chunk) => chunk,
                ChunkRead::Closed => {
                    decoder.finish();
                    return LoopEnd::Closed;
                }
                ChunkRead::Failed(err) => return LoopEnd::Failed(err.into()),
                ChunkRead::Idle => return LoopEnd::Failed(self.idle_error()),
            };

            decoder.push(&chunk);
            for line in decoder.lines() {
                if token.is_cancelled() {
                    return LoopEnd::Failed(SessionError::Cancelled);
                }

                let Some(event) = parse_frame(&line) else {
                    continue;
                };
                tracing::trace!(kind = event.event_type_name(), "Frame received");

                match session.state.apply(&event) {
                    Transition::Ignored => {}
                    Transition::Progress => {
                        tracing::debug!(
                            stage = %session.state.current_stage,
                            progress = session.state.current_progress,
                            "Progress"
                        );
                        sink.on_state(&session.state);
                        session.snapshots.save(&session.state, &session.history).await;
                    }
                    Transition::Completed => {
                        sink.on_state(&session.state);
                        return match session.state.result.clone() {
                            Some(result) => LoopEnd::Completed(result),
                            None => LoopEnd::Failed(SessionError::no_result()),
                        };
                    }
                }
            }
        }
    }

    /// POST the request and wait for the response head, bounded by the
    /// idle timeout.
    async fn open_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> SessionResult<ByteStream> {
        let open = self.http.post_stream(url, body, headers);
        let opened = match self.config.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, open).await {
                Ok(opened) => opened,
                Err(_) => {
                    tracing::debug!(url, "No response head within the idle timeout");
                    return Err(self.idle_error());
                }
            },
            None => open.await,
        };
        opened.map_err(SessionError::from)
    }

    fn idle_error(&self) -> SessionError {
        SessionError::Timeout {
            duration_secs: self.config.idle_timeout.map_or(0, |d| d.as_secs()),
        }
    }
}

/// Next chunk, or `Idle` once `idle_at` passes first.
async fn read_chunk(stream: &mut ByteStream, idle_at: Option<Instant>) -> ChunkRead {
    let next = match idle_at {
        Some(deadline) => match timeout_at(deadline, stream.next()).await {
            Ok(next) => next,
            Err(_) => return ChunkRead::Idle,
        },
        None => stream.next().await,
    };

    match next {
        Some(Ok(chunk)) => ChunkRead::Chunk(chunk),
        Some(Err(err)) => ChunkRead::Failed(err),
        None => ChunkRead::Closed,
    }
}

fn json_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

fn stream_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "text/event-stream".to_string());
    headers.insert("Cache-Control".to_string(), "no-cache".to_string());
    headers
}
