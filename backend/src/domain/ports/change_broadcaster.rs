//! Port for pushing committed changes to live sessions.

use std::sync::{Mutex, PoisonError};

use crate::domain::LedgerEvent;

/// Fan-out of committed changes.
///
/// Publishing is best-effort and infallible from the caller's point of view:
/// a session that cannot take the message is dropped by the adapter, and the
/// mutation that raised the event still succeeds.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeBroadcaster: Send + Sync {
    /// Deliver `event` to every live session.
    fn publish(&self, event: &LedgerEvent);
}

/// Broadcaster that keeps every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<LedgerEvent>>,
}

impl RecordingBroadcaster {
    /// Events published so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ChangeBroadcaster for RecordingBroadcaster {
    fn publish(&self, event: &LedgerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
