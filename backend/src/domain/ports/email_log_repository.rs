//! Port for the append-only reminder log.

use std::sync::Mutex;

use crate::domain::EmailLogEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised by email log adapters.
    pub enum EmailLogError {
        /// Reading, appending to, or clearing the log failed.
        Io { message: String } => "email log I/O failed: {message}",
        /// An entry could not be encoded.
        Encode { message: String } => "email log entry could not be encoded: {message}",
    }
}

/// Append-only store of sent reminders.
#[cfg_attr(test, mockall::automock)]
pub trait EmailLogRepository: Send + Sync {
    /// Append entries in order.
    ///
    /// # Errors
    /// Returns [`EmailLogError`] when the entries cannot be written.
    fn append(&self, entries: &[EmailLogEntry]) -> Result<(), EmailLogError>;

    /// Every readable entry in append order.
    ///
    /// # Errors
    /// Returns [`EmailLogError::Io`] when the log exists but cannot be read.
    fn load_all(&self) -> Result<Vec<EmailLogEntry>, EmailLogError>;

    /// Remove every entry.
    ///
    /// # Errors
    /// Returns [`EmailLogError::Io`] when the log cannot be removed.
    fn clear(&self) -> Result<(), EmailLogError>;
}

/// In-memory log for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryEmailLogRepository {
    entries: Mutex<Vec<EmailLogEntry>>,
}

impl EmailLogRepository for InMemoryEmailLogRepository {
    fn append(&self, entries: &[EmailLogEntry]) -> Result<(), EmailLogError> {
        self.entries
            .lock()
            .map_err(|_| EmailLogError::io("email log lock poisoned"))?
            .extend_from_slice(entries);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<EmailLogEntry>, EmailLogError> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| EmailLogError::io("email log lock poisoned"))?
            .clone())
    }

    fn clear(&self) -> Result<(), EmailLogError> {
        self.entries
            .lock()
            .map_err(|_| EmailLogError::io("email log lock poisoned"))?
            .clear();
        Ok(())
    }
}
