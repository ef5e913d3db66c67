//! Progress state machine.
//!
//! `SessionState` is mutated only by the session read loop. Once a completion
//! has been applied or a local failure recorded, the state is terminal and
//! absorbs every further event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GenerationResult, StageId};
use crate::sse::{ProgressEvent, StreamEvent};

/// Message shown while the request is being opened
pub const CONNECTING_MESSAGE: &str = "Connecting…";

/// Failure recorded when the caller cancels an in-flight session
pub const CANCELLED_MESSAGE: &str = "Generation cancelled";

/// Outcome of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State was already terminal; nothing changed
    Ignored,
    /// Display fields were updated
    Progress,
    /// A completion was applied and the state is now terminal
    Completed,
}

/// State of one generation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Local identifier, regenerated on every `begin()`
    pub session_id: Uuid,
    pub current_stage: StageId,
    pub current_progress: u8,
    /// Highest progress reported so far
    #[serde(default)]
    pub peak_progress: u8,
    pub current_message: String,
    #[serde(default)]
    pub current_details: Option<String>,
    #[serde(default)]
    pub last_update_timestamp: Option<String>,
    /// Latest payload reported by each stage
    #[serde(default)]
    pub stage_payloads: BTreeMap<StageId, serde_json::Value>,
    #[serde(default)]
    pub result: Option<GenerationResult>,
    #[serde(default)]
    pub terminal: bool,
    /// Cause of a local or remote failure
    #[serde(default)]
    pub failure: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            current_stage: StageId::Orchestrating,
            current_progress: 0,
            peak_progress: 0,
            current_message: CONNECTING_MESSAGE.to_string(),
            current_details: None,
            last_update_timestamp: None,
            stage_payloads: BTreeMap::new(),
            result: None,
            terminal: false,
            failure: None,
        }
    }

    /// Reset for a new session (the open transition)
    pub fn begin(&mut self) {
        *self = Self::new();
        self.last_update_timestamp = Some(now());
    }

    /// Apply one classified event.
    pub fn apply(&mut self, event: &StreamEvent) -> Transition {
        if self.terminal {
            return Transition::Ignored;
        }

        match event {
            StreamEvent::Progress(progress) => {
                self.apply_progress(progress);
                Transition::Progress
            }
            StreamEvent::Complete(result) => {
                self.apply_completion(result);
                Transition::Completed
            }
        }
    }

    fn apply_progress(&mut self, event: &ProgressEvent) {
        self.current_stage = event.stage;
        self.current_progress = event.progress;
        self.peak_progress = self.peak_progress.max(event.progress);
        self.current_message = event.message.clone();
        self.current_details = event.details.clone();
        self.last_update_timestamp = Some(event.timestamp.clone().unwrap_or_else(now));

        if let Some(payload) = &event.payload {
            self.stage_payloads.insert(event.stage, payload.clone());
        }
    }

    fn apply_completion(&mut self, result: &GenerationResult) {
        self.terminal = true;
        self.last_update_timestamp = Some(now());

        if result.is_completed() {
            self.current_stage = StageId::Complete;
            self.current_progress = 100;
            self.peak_progress = 100;
            self.current_message = "Generation complete".to_string();
        } else {
            let message = result.failure_message().unwrap_or("Generation failed").to_string();
            self.current_stage = StageId::Error;
            self.current_message = message.clone();
            self.failure = Some(message);
        }

        self.result = Some(result.clone());
    }

    /// Terminate locally without a result.
    ///
    /// Returns false if the state was already terminal.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.terminal {
            return false;
        }

        let message = message.into();
        self.terminal = true;
        self.current_stage = StageId::Error;
        self.current_message = message.clone();
        self.failure = Some(message);
        self.last_update_timestamp = Some(now());
        true
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_completed(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.is_completed())
    }

    pub fn payload_for(&self, stage: StageId) -> Option<&serde_json::Value> {
        self.stage_payloads.get(&stage)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationStatus;
    use serde_json::json;

    fn progress(stage: StageId, pct: u8, msg: &str) -> StreamEvent {
        StreamEvent::Progress(ProgressEvent::new(stage, pct, msg))
    }

    fn result(status: GenerationStatus) -> GenerationResult {
        let error = (status == GenerationStatus::Failed).then_some("quota exceeded");
        serde_json::from_value(json!({
            "request_id": "req-1",
            "status": status,
            "content": "Dear hiring manager",
            "error": error
        }))
        .unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = SessionState::new();
        assert_eq!(state.current_stage, StageId::Orchestrating);
        assert_eq!(state.current_progress, 0);
        assert_eq!(state.current_message, CONNECTING_MESSAGE);
        assert!(!state.is_terminal());
        assert!(state.result.is_none());
    }

    #[test]
    fn test_begin_resets_state() {
        let mut state = SessionState::new();
        let first_id = state.session_id;
        state.apply(&progress(StageId::Writing, 40, "Drafting"));
        state.fail("boom");

        state.begin();
        assert_ne!(state.session_id, first_id);
        assert_eq!(state.current_stage, StageId::Orchestrating);
        assert!(!state.is_terminal());
        assert!(state.failure.is_none());
        assert!(state.last_update_timestamp.is_some());
    }

    #[test]
    fn test_progress_updates_display_fields() {
        let mut state = SessionState::new();
        let event = ProgressEvent::new(StageId::Researching, 20, "Gathering")
            .with_details("3 sources")
            .with_timestamp("2024-01-01T00:00:00Z");

        let transition = state.apply(&StreamEvent::Progress(event));
        assert_eq!(transition, Transition::Progress);
        assert_eq!(state.current_stage, StageId::Researching);
        assert_eq!(state.current_progress, 20);
        assert_eq!(state.current_message, "Gathering");
        assert_eq!(state.current_details.as_deref(), Some("3 sources"));
        assert_eq!(state.last_update_timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_missing_timestamp_uses_local_time() {
        let mut state = SessionState::new();
        state.apply(&progress(StageId::Writing, 10, "x"));
        let ts = state.last_update_timestamp.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_progress_not_assumed_monotonic() {
        let mut state = SessionState::new();
        state.apply(&progress(StageId::Assessing, 70, "Assessing"));
        state.apply(&progress(StageId::Researching, 30, "Back to research"));
        assert_eq!(state.current_stage, StageId::Researching);
        assert_eq!(state.current_progress, 30);
        assert_eq!(state.peak_progress, 70);
    }

    #[test]
    fn test_last_payload_per_stage_wins() {
        let mut state = SessionState::new();
        let events = [
            ProgressEvent::new(StageId::Assessing, 70, "a").with_payload(json!({"score": 60})),
            ProgressEvent::new(StageId::Refining, 75, "r").with_payload(json!({"round": 1})),
            ProgressEvent::new(StageId::Assessing, 80, "a").with_payload(json!({"score": 88})),
            ProgressEvent::new(StageId::Writing, 85, "w"),
        ];
        for event in events {
            state.apply(&StreamEvent::Progress(event));
        }

        assert_eq!(state.stage_payloads.len(), 2);
        assert_eq!(state.payload_for(StageId::Assessing), Some(&json!({"score": 88})));
        assert_eq!(state.payload_for(StageId::Refining), Some(&json!({"round": 1})));
        assert!(state.payload_for(StageId::Writing).is_none());
    }

    #[test]
    fn test_progress_frame_naming_complete_is_not_terminal() {
        let mut state = SessionState::new();
        state.apply(&progress(StageId::Complete, 100, "Done"));
        assert_eq!(state.current_stage, StageId::Complete);
        assert!(!state.is_terminal());
        assert!(state.result.is_none());
    }

    #[test]
    fn test_completion_success() {
        let mut state = SessionState::new();
        state.apply(&progress(StageId::Saving, 95, "Saving"));
        let done = result(GenerationStatus::Completed);

        assert_eq!(state.apply(&StreamEvent::Complete(done.clone())), Transition::Completed);
        assert!(state.is_terminal());
        assert!(state.is_completed());
        assert_eq!(state.current_stage, StageId::Complete);
        assert_eq!(state.current_progress, 100);
        assert_eq!(state.result, Some(done));
        assert!(state.failure.is_none());
    }

    #[test]
    fn test_completion_failed_result() {
        let mut state = SessionState::new();
        state.apply(&progress(StageId::Writing, 45, "Drafting"));
        state.apply(&StreamEvent::Complete(result(GenerationStatus::Failed)));

        assert!(state.is_terminal());
        assert!(!state.is_completed());
        assert_eq!(state.current_stage, StageId::Error);
        assert_eq!(state.current_progress, 45);
        assert_eq!(state.failure.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_terminal_absorbs_events() {
        let mut state = SessionState::new();
        state.apply(&StreamEvent::Complete(result(GenerationStatus::Completed)));
        let snapshot = state.clone();

        assert_eq!(state.apply(&progress(StageId::Writing, 10, "late")), Transition::Ignored);
        assert_eq!(
            state.apply(&StreamEvent::Complete(result(GenerationStatus::Failed))),
            Transition::Ignored
        );
        assert!(!state.fail("late failure"));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_fail_is_terminal_without_result() {
        let mut state = SessionState::new();
        state.apply(&progress(StageId::Writing, 40, "Drafting"));
        assert!(state.fail(CANCELLED_MESSAGE));

        assert!(state.is_terminal());
        assert_eq!(state.current_stage, StageId::Error);
        assert_eq!(state.current_message, CANCELLED_MESSAGE);
        assert_eq!(state.failure.as_deref(), Some(CANCELLED_MESSAGE));
        assert!(state.result.is_none());
        assert_eq!(state.apply(&progress(StageId::Writing, 50, "late")), Transition::Ignored);
    }

    #[test]
    fn test_state_serde_roundtrip() {
        let mut state = SessionState::new();
        state.apply(&StreamEvent::Progress(
            ProgressEvent::new(StageId::Assessing, 70, "a").with_payload(json!({"score": 82.5})),
        ));
        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
