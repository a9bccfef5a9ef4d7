//! Driving port for ledger reads.

use async_trait::async_trait;

use crate::domain::{EmailLogEntry, Error, LedgerSnapshot};

/// Read access to the ledger and email log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// The current ledger snapshot.
    ///
    /// # Errors
    /// Internal error when the ledger lock is poisoned.
    async fn snapshot(&self) -> Result<LedgerSnapshot, Error>;

    /// Every logged reminder, oldest first.
    ///
    /// # Errors
    /// Internal error when the log cannot be read.
    async fn email_log(&self) -> Result<Vec<EmailLogEntry>, Error>;
}
