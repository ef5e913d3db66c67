//! Throttled persistence of the observable session state.
//!
//! A snapshot is written at most once per debounce interval; snapshots
//! produced in between are coalesced and only the latest is kept until
//! [`SnapshotStore::flush_due_at`] passes or an explicit
//! [`SnapshotStore::flush`]. Storage failures are logged and never interrupt
//! a session.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::StorageError;
use crate::state::{History, SessionState};
use crate::traits::KeyValueStore;

/// Key under which the snapshot is stored
pub const SNAPSHOT_KEY: &str = "writeflow.session";

/// Default minimum interval between two writes
pub const DEFAULT_SNAPSHOT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Persisted projection of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub history: History,
    /// RFC 3339 time the snapshot was taken
    pub saved_at: String,
}

impl SessionSnapshot {
    pub fn capture(state: &SessionState, history: &History) -> Self {
        Self {
            state: state.clone(),
            history: history.clone(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// A restored non-terminal state belongs to a stream that no longer
    /// exists. Nothing reconnects to it.
    pub fn is_stale(&self) -> bool {
        !self.state.is_terminal()
    }
}

pub struct SnapshotStore<S: KeyValueStore> {
    store: S,
    debounce: Duration,
    last_write: Option<Instant>,
    pending: Option<SessionSnapshot>,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            debounce: DEFAULT_SNAPSHOT_DEBOUNCE,
            last_write: None,
            pending: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record the latest state; writes only if the debounce window has passed.
    pub async fn save(&mut self, state: &SessionState, history: &History) {
        self.pending = Some(SessionSnapshot::capture(state, history));

        let due = self
            .last_write
            .map_or(true, |at| at.elapsed() >= self.debounce);
        if due {
            self.flush().await;
        }
    }

    /// When the pending snapshot may be written, or `None` if nothing is
    /// pending. The owner is expected to call [`flush`](Self::flush) then.
    pub fn flush_due_at(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        Some(match self.last_write {
            Some(at) => at + self.debounce,
            None => Instant::now(),
        })
    }

    /// Forget the pending snapshot without writing it.
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    /// Write the pending snapshot now, if any.
    pub async fn flush(&mut self) {
        let Some(snapshot) = self.pending.take() else {
            return;
        };

        self.last_write = Some(Instant::now());
        if let Err(e) = self.write(&snapshot).await {
            tracing::warn!(error = %e, "Failed to persist session snapshot");
        }
    }

    async fn write(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string(snapshot)?;
        self.store.set(SNAPSHOT_KEY, &json).await
    }

    /// Last persisted snapshot. Missing, unreadable or corrupt data is `None`.
    pub async fn load(&self) -> Option<SessionSnapshot> {
        let raw = match self.store.get(SNAPSHOT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session snapshot");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt session snapshot");
                None
            }
        }
    }

    /// Drop the pending snapshot and remove the persisted one.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.pending = None;
        self.store.remove(SNAPSHOT_KEY).await
    }
}
