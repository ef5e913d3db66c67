//! At most one active session per client.
//!
//! Each session registers a `CancellationToken` in a shared slot. Registering
//! a new one cancels whatever was there; the guard clears the slot on drop
//! unless a newer session has taken it over.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct ActiveEntry {
    id: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct Slot {
    next_id: u64,
    active: Option<ActiveEntry>,
}

/// Cloneable handle that can cancel whichever session is active.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    slot: Arc<Mutex<Slot>>,
}

impl CancelHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // Poisoning is ignored
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cancel the active session.
    ///
    /// Returns false if no session is active or it was already cancelled.
    pub fn cancel(&self) -> bool {
        let slot = self.lock();
        match &slot.active {
            Some(entry) if !entry.token.is_cancelled() => {
                tracing::info!(session = entry.id, "Cancelling active generation");
                entry.token.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock()
            .active
            .as_ref()
            .is_some_and(|entry| !entry.token.is_cancelled())
    }

    /// Whether a session registered after `id`, whether or not it is
    /// still running.
    pub(crate) fn is_superseded(&self, id: u64) -> bool {
        self.lock().next_id > id
    }

    /// Register a new session, cancelling the previous one.
    pub(crate) fn begin(&self) -> SessionGuard {
        let mut slot = self.lock();
        slot.next_id += 1;
        let id = slot.next_id;

        if let Some(previous) = slot.active.take() {
            tracing::info!(previous = previous.id, session = id, "Superseding active generation");
            previous.token.cancel();
        }

        let token = CancellationToken::new();
        slot.active = Some(ActiveEntry {
            id,
            token: token.clone(),
        });

        SessionGuard {
            handle: self.clone(),
            id,
            token,
        }
    }
}

/// Registration of one running session.
#[derive(Debug)]
pub(crate) struct SessionGuard {
    handle: CancelHandle,
    id: u64,
    token: CancellationToken,
}

impl SessionGuard {
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut slot = self.handle.lock();
        if slot.active.as_ref().is_some_and(|entry| entry.id == self.id) {
            slot.active = None;
        }
    }
}
