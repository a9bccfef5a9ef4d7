//! Port for handing logged reminders to the mail transport.

use std::sync::{Mutex, PoisonError};

use crate::domain::EmailLogEntry;

/// Fire-and-forget delivery of logged reminders.
///
/// Implementations must return promptly: the reminders are already logged
/// and broadcast when this is called, and delivery failures are the
/// dispatcher's to absorb.
#[cfg_attr(test, mockall::automock)]
pub trait MailDispatcher: Send + Sync {
    /// Queue `entries` for delivery.
    fn dispatch(&self, entries: Vec<EmailLogEntry>);
}

/// Dispatcher that records what it was given.
#[derive(Debug, Default)]
pub struct RecordingMailDispatcher {
    dispatched: Mutex<Vec<EmailLogEntry>>,
}

impl RecordingMailDispatcher {
    /// Every entry handed over so far.
    #[must_use]
    pub fn dispatched(&self) -> Vec<EmailLogEntry> {
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MailDispatcher for RecordingMailDispatcher {
    fn dispatch(&self, entries: Vec<EmailLogEntry>) {
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(entries);
    }
}
