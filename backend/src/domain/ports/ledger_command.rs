//! Driving port for ledger mutations.
//!
//! Inbound adapters call [`LedgerCommand`] to change the ledger or the email
//! log. Every successful call has been validated, applied, persisted, and
//! broadcast by the time it returns.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EmailDraft, Error, RawRecord};

/// Result of an import, sample load, or bulk return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatchOutcome {
    /// Ledger version after the operation.
    pub version: u64,
    /// Rows counted by the operation.
    pub count: usize,
}

/// Driving port for ledger and email log mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Validate and merge spreadsheet rows; `count` is the ledger size after
    /// the merge.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::InvalidRequest`] with every row error when
    /// any record fails validation; internal error when persistence fails.
    async fn import_rows(&self, records: Vec<RawRecord>) -> Result<BatchOutcome, Error>;

    /// Validate and merge one hand-entered record; returns the new version.
    ///
    /// # Errors
    /// As for [`LedgerCommand::import_rows`], with every field required.
    async fn add_record(&self, record: RawRecord) -> Result<u64, Error>;

    /// Merge the built-in sample records.
    ///
    /// # Errors
    /// Internal error when persistence fails.
    async fn load_sample(&self) -> Result<BatchOutcome, Error>;

    /// Return one copy; a no-op for unknown or already returned copies.
    ///
    /// # Errors
    /// Invalid request for a blank identifier; internal error when
    /// persistence fails.
    async fn return_copy(&self, copy_uid: &str) -> Result<BatchOutcome, Error>;

    /// Return every issued copy held by a student.
    ///
    /// # Errors
    /// Invalid request for a blank email; internal error when persistence
    /// fails.
    async fn return_student(&self, student_email: &str) -> Result<BatchOutcome, Error>;

    /// Log sent reminders, broadcast them, then hand them to the mailer.
    /// Returns the number of entries logged. An empty batch logs nothing and
    /// sends no `EMAILS_SENT` push.
    ///
    /// # Errors
    /// Internal error when the log cannot be written.
    async fn record_emails(
        &self,
        drafts: Vec<EmailDraft>,
        origin_id: Option<String>,
    ) -> Result<usize, Error>;

    /// Clear the ledger and email log when `confirm` is exactly `RESET`.
    ///
    /// # Errors
    /// Invalid request without the confirmation literal; internal error when
    /// persistence fails.
    async fn reset(&self, confirm: &str) -> Result<u64, Error>;
}
