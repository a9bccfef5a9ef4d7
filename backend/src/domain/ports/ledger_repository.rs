//! Port for durable ledger snapshots.
//!
//! The ledger is persisted as one whole snapshot per mutation. Adapters must
//! replace the stored snapshot atomically so a crash never leaves a torn file.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::LedgerSnapshot;

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger snapshot adapters.
    pub enum LedgerPersistenceError {
        /// Reading or writing the snapshot failed.
        Io { message: String } => "ledger snapshot I/O failed: {message}",
        /// The stored snapshot could not be decoded.
        Corrupt { message: String } => "ledger snapshot is corrupt: {message}",
    }
}

/// Durable storage for the ledger snapshot.
#[cfg_attr(test, mockall::automock)]
pub trait LedgerRepository: Send + Sync {
    /// Read the stored snapshot; `None` when nothing has been written yet.
    ///
    /// # Errors
    /// Returns [`LedgerPersistenceError::Corrupt`] for undecodable content and
    /// [`LedgerPersistenceError::Io`] when the store cannot be read.
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerPersistenceError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    /// Returns [`LedgerPersistenceError::Io`] when the write fails; the
    /// previous snapshot must then still be intact.
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerPersistenceError>;
}

/// In-memory repository for tests and ephemeral runs.
///
/// Saves can be made to fail on demand to exercise rollback paths.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    stored: Mutex<Option<LedgerSnapshot>>,
    fail_saves: AtomicBool,
}

impl InMemoryLedgerRepository {
    /// Start with an existing snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            stored: Mutex::new(Some(snapshot)),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The last snapshot saved, if any.
    #[must_use]
    pub fn stored(&self) -> Option<LedgerSnapshot> {
        self.stored
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerPersistenceError> {
        Ok(self.stored())
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerPersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LedgerPersistenceError::io("simulated write failure"));
        }
        let mut stored = self
            .stored
            .lock()
            .map_err(|_| LedgerPersistenceError::io("snapshot lock poisoned"))?;
        *stored = Some(snapshot.clone());
        Ok(())
    }
}
