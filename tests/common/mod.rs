//! Common test utilities for integration tests.
//!
//! Frame builders and session fixtures shared by the generation tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use writeflow::adapters::mock::{InMemoryStore, MockHttpClient, MockResponse};
use writeflow::config::ClientConfig;
use writeflow::generation::{GenerationClient, Session};
use writeflow::models::{RequestPayload, WritingContext, WritingRequirements};
use writeflow::state::SessionState;

pub const BASE_URL: &str = "http://writer.test/api/v1";

pub fn stream_url() -> String {
    format!("{}/writing/stream", BASE_URL)
}

pub fn test_config() -> ClientConfig {
    ClientConfig::default().with_base_url(BASE_URL)
}

pub fn cover_letter_request() -> RequestPayload {
    RequestPayload::new(
        "test-user",
        WritingContext::CoverLetter {
            job_title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
        },
    )
    .with_requirements(WritingRequirements::default().with_max_words(400))
}

/// One `data:` line for a progress event
pub fn progress_frame(stage: &str, progress: u8, message: &str) -> String {
    data_line(&json!({"stage": stage, "progress": progress, "message": message}))
}

pub fn progress_frame_with_payload(stage: &str, progress: u8, message: &str, payload: Value) -> String {
    data_line(&json!({
        "stage": stage,
        "progress": progress,
        "message": message,
        "data": payload
    }))
}

pub fn result_json(request_id: &str, status: &str) -> Value {
    json!({
        "request_id": request_id,
        "status": status,
        "content": "Dear Hiring Manager, ...",
        "quality_metrics": {
            "overall_score": 88.5,
            "coherence": 90.0,
            "naturalness": 87.0,
            "grammar_accuracy": 95.0,
            "completeness": 85.0,
            "lexical_quality": 84.0,
            "personalization": 80.0
        },
        "text_stats": {
            "word_count": 312,
            "character_count": 1890,
            "character_count_no_spaces": 1570,
            "paragraph_count": 4,
            "line_count": 12,
            "estimated_pages": 0.6
        },
        "suggestions": ["Mention a concrete project"],
        "iterations": 2,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:01:00Z"
    })
}

pub fn complete_frame(result: Value) -> String {
    data_line(&json!({"type": "complete", "data": result}))
}

pub fn data_line(value: &Value) -> String {
    format!("data: {}\n\n", value)
}

pub fn mock_client(response: MockResponse) -> GenerationClient<MockHttpClient> {
    let http = MockHttpClient::new();
    http.set_response(&stream_url(), response);
    GenerationClient::new(http, test_config())
}

pub fn new_session(store: &InMemoryStore) -> Session<InMemoryStore> {
    Session::new(store.clone(), &test_config())
}

/// Sink that keeps a copy of every state it receives
#[derive(Default)]
pub struct RecordingSink {
    pub states: Vec<SessionState>,
}

impl writeflow::traits::StatusSink for RecordingSink {
    fn on_state(&mut self, state: &SessionState) {
        self.states.push(state.clone());
    }
}
