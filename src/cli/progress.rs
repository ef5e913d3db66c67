//! Progress lines for the terminal.

use std::io::Write;

use crate::state::SessionState;
use crate::traits::StatusSink;

/// Sink that prints one line per visible change of stage, progress or message.
pub struct ProgressPrinter<W: Write + Send> {
    out: W,
    last: Option<String>,
}

impl<W: Write + Send> ProgressPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render one state as a status line
pub fn format_state(state: &SessionState) -> String {
    let mut line = format!(
        "[{:>3}%] {}: {}",
        state.current_progress,
        state.current_stage.label(),
        state.current_message
    );
    if let Some(details) = &state.current_details {
        line.push_str(" (");
        line.push_str(details);
        line.push(')');
    }
    line
}

impl<W: Write + Send> StatusSink for ProgressPrinter<W> {
    fn on_state(&mut self, state: &SessionState) {
        let line = format_state(state);
        if self.last.as_deref() == Some(line.as_str()) {
            return;
        }

        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::debug!(error = %e, "Failed to write progress line");
        }
        self.last = Some(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StageId;
    use crate::sse::{ProgressEvent, StreamEvent};

    fn output(printer: ProgressPrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_format_state() {
        let mut state = SessionState::new();
        state.apply(&StreamEvent::Progress(
            ProgressEvent::new(StageId::Assessing, 70, "Quality: 82.0/100").with_details("round 1"),
        ));
        assert_eq!(
            format_state(&state),
            "[ 70%] Assessing quality: Quality: 82.0/100 (round 1)"
        );
    }

    #[test]
    fn test_repeated_state_printed_once() {
        let mut printer = ProgressPrinter::new(Vec::new());
        let state = SessionState::new();
        printer.on_state(&state);
        printer.on_state(&state);
        assert_eq!(output(printer), "[  0%] Orchestrating: Connecting…\n");
    }

    #[test]
    fn test_changes_printed() {
        let mut printer = ProgressPrinter::new(Vec::new());
        let mut state = SessionState::new();
        printer.on_state(&state);
        state.apply(&StreamEvent::Progress(ProgressEvent::new(
            StageId::Writing,
            45,
            "Drafting",
        )));
        printer.on_state(&state);

        let out = output(printer);
        assert_eq!(out.lines().count(), 2);
        assert!(out.ends_with("[ 45%] Writing: Drafting\n"));
    }
}
