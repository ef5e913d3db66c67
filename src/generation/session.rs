//! Caller-owned session handle.

use crate::config::ClientConfig;
use crate::snapshot::{SessionSnapshot, SnapshotStore};
use crate::state::{History, SessionState};
use crate::traits::KeyValueStore;

/// State, history and snapshot persistence for one caller.
///
/// Passed by `&mut` to [`GenerationClient::start`](super::GenerationClient::start),
/// which is the only writer while a stream is running.
pub struct Session<S: KeyValueStore> {
    pub(crate) state: SessionState,
    pub(crate) history: History,
    pub(crate) snapshots: SnapshotStore<S>,
    restored_stale: bool,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S, config: &ClientConfig) -> Self {
        Self {
            state: SessionState::new(),
            history: History::new(config.history_capacity),
            snapshots: SnapshotStore::new(store).with_debounce(config.snapshot_debounce),
            restored_stale: false,
        }
    }

    /// Rebuild from the last persisted snapshot, or start fresh if there is
    /// none. A restored in-progress state is shown as-is; no stream is resumed.
    pub async fn restore(store: S, config: &ClientConfig) -> Self {
        let mut session = Self::new(store, config);

        let Some(snapshot) = session.snapshots.load().await else {
            return session;
        };

        session.restored_stale = snapshot.is_stale();
        if session.restored_stale {
            tracing::info!(
                session_id = %snapshot.state.session_id,
                stage = %snapshot.state.current_stage,
                "Restored snapshot of an unfinished generation"
            );
        }

        let SessionSnapshot { state, history, .. } = snapshot;
        session.state = state;
        // Re-bound to the configured capacity, keeping most-recent-first order
        for result in history.iter().rev() {
            session.history.push_front(result.clone());
        }
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    /// Whether the state came from a snapshot of a stream that never finished
    pub fn is_stale(&self) -> bool {
        self.restored_stale && !self.state.is_terminal()
    }

    /// Persist the current state now
    pub async fn persist(&mut self) {
        self.snapshots.save(&self.state, &self.history).await;
        self.snapshots.flush().await;
    }

    pub(crate) fn mark_fresh(&mut self) {
        self.restored_stale = false;
    }
}
