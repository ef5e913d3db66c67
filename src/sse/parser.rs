//! Frame classification.
//!
//! Only `data:` lines carry events. Everything else (blank separators,
//! `:` keep-alive comments, `event:` names) is ignored. A data line whose JSON
//! does not parse, or that does not match a known event shape, is dropped:
//! losing one progress tick must not abort the session.

use serde::Deserialize;

use crate::models::GenerationResult;
use crate::sse::events::{ProgressEvent, StreamEvent};

/// Prefix of lines carrying an event payload
pub const DATA_PREFIX: &str = "data:";

/// Discriminator value marking the terminal frame
const COMPLETE_KIND: &str = "complete";

/// Represents a classified stream line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine<'a> {
    /// Data payload (e.g., "data: {\"stage\": \"write\"}")
    Data(&'a str),
    /// Event type declaration (e.g., "event: progress")
    Event(&'a str),
    /// Empty line between events
    Empty,
    /// Comment line or anything unrecognised
    Comment(&'a str),
}

/// Classify a single decoded line
pub fn parse_sse_line(line: &str) -> SseLine<'_> {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim());
    }

    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(rest.trim());
    }

    SseLine::Comment(line)
}

#[derive(Deserialize)]
struct CompletionFrame {
    #[serde(alias = "result")]
    data: GenerationResult,
}

/// Turn one line into an event, or `None` if it carries none.
pub fn parse_frame(line: &str) -> Option<StreamEvent> {
    let SseLine::Data(data) = parse_sse_line(line) else {
        return None;
    };

    let value: serde_json::Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Dropping data frame with invalid JSON");
            return None;
        }
    };

    classify(value)
}

/// Dispatch a parsed payload on its discriminator.
fn classify(value: serde_json::Value) -> Option<StreamEvent> {
    let kind = value
        .get("type")
        .or_else(|| value.get("kind"))
        .and_then(|v| v.as_str());

    match kind {
        Some(COMPLETE_KIND) => match serde_json::from_value::<CompletionFrame>(value) {
            Ok(frame) => Some(StreamEvent::Complete(frame.data)),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed completion frame");
                None
            }
        },
        None | Some("progress") => match serde_json::from_value::<ProgressEvent>(value) {
            Ok(event) => Some(StreamEvent::Progress(event)),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping frame that is not a progress event");
                None
            }
        },
        Some(other) => {
            tracing::debug!(kind = other, "Ignoring frame with unknown discriminator");
            None
        }
    }
}
