//! Typed stream events.
//!
//! A frame is either a progress tick for one pipeline stage or the terminal
//! completion carrying the generation result.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{GenerationResult, StageId};

/// Progress tick for one pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub stage: StageId,
    /// Percentage, clamped into 0..=100
    #[serde(deserialize_with = "deserialize_progress")]
    pub progress: u8,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO-8601 emission time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Stage diagnostics, opaque to the client
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ProgressEvent {
    pub fn new(stage: StageId, progress: u8, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: progress.min(100),
            message: message.into(),
            details: None,
            timestamp: None,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Accept integer or fractional percentages and clamp them into range.
fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Err(serde::de::Error::custom("progress is not a number"));
    }
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}

/// A classified stream frame
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Progress(ProgressEvent),
    /// Terminal event carrying the final artifact
    Complete(GenerationResult),
}

impl StreamEvent {
    /// Returns the event type name as a string for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Progress(_) => "progress",
            StreamEvent::Complete(_) => "complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_event_minimal() {
        let event: ProgressEvent =
            serde_json::from_str(r#"{"stage":"orchestrating","progress":0,"message":"Initializing"}"#)
                .unwrap();
        assert_eq!(event, ProgressEvent::new(StageId::Orchestrating, 0, "Initializing"));
    }

    #[test]
    fn test_progress_clamped_and_rounded() {
        let event: ProgressEvent =
            serde_json::from_str(r#"{"stage":"write","progress":44.6,"message":"m"}"#).unwrap();
        assert_eq!(event.progress, 45);

        let event: ProgressEvent =
            serde_json::from_str(r#"{"stage":"write","progress":250,"message":"m"}"#).unwrap();
        assert_eq!(event.progress, 100);

        let event: ProgressEvent =
            serde_json::from_str(r#"{"stage":"write","progress":-3,"message":"m"}"#).unwrap();
        assert_eq!(event.progress, 0);
    }

    #[test]
    fn test_progress_requires_numeric_progress() {
        let result =
            serde_json::from_str::<ProgressEvent>(r#"{"stage":"write","progress":"half","message":"m"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_accepts_data_key() {
        let event: ProgressEvent = serde_json::from_str(
            r#"{"stage":"assess","progress":70,"message":"Quality: 82.0/100","data":{"score":82.0}}"#,
        )
        .unwrap();
        assert_eq!(event.payload.unwrap()["score"], 82.0);
    }

    #[test]
    fn test_event_type_name() {
        let progress = StreamEvent::Progress(ProgressEvent::new(StageId::Writing, 40, "Drafting"));
        assert_eq!(progress.event_type_name(), "progress");
    }

    #[test]
    fn test_new_clamps_progress() {
        assert_eq!(ProgressEvent::new(StageId::Writing, 180, "x").progress, 100);
    }
}
