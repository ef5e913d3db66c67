//! Status sink trait abstraction.
//!
//! Presentation layers receive every state the session controller applies.
//! The core makes no assumption about rendering.

use crate::state::SessionState;

/// Receiver of session state updates.
///
/// Called on the session's read loop after the state has been updated, so
/// the state passed in is always consistent. Implementations should return
/// quickly; the next chunk is not read until this returns.
pub trait StatusSink: Send {
    fn on_state(&mut self, state: &SessionState);
}

impl<F> StatusSink for F
where
    F: FnMut(&SessionState) + Send,
{
    fn on_state(&mut self, state: &SessionState) {
        self(state)
    }
}

/// Sink that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl StatusSink for NoopSink {
    fn on_state(&mut self, _state: &SessionState) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StageId;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |state: &SessionState| seen.push(state.current_stage);
            let state = SessionState::new();
            sink.on_state(&state);
            sink.on_state(&state);
        }
        assert_eq!(seen, vec![StageId::Orchestrating, StageId::Orchestrating]);
    }

    #[test]
    fn test_noop_sink() {
        let mut sink = NoopSink;
        sink.on_state(&SessionState::new());
    }
}
