//! Change events raised after a committed mutation.

use super::email_log::EmailLogEntry;
use super::loan::LoanRow;

/// A committed change, ready to be fanned out to live sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Rows were merged; carries the full row set.
    Import {
        /// Every row after the merge.
        rows: Vec<LoanRow>,
        /// Version after the merge.
        version: u64,
    },
    /// Copies were returned.
    Return {
        /// Normalised identifiers of the returned copies.
        uids: Vec<String>,
        /// Version after the return.
        version: u64,
    },
    /// Reminder emails were logged.
    EmailsSent {
        /// The new log entries.
        entries: Vec<EmailLogEntry>,
        /// Opaque tag of the session that sent them.
        origin_id: Option<String>,
    },
    /// The ledger and email log were cleared.
    Reset {
        /// Version after the reset.
        version: u64,
    },
}

impl LedgerEvent {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Import { .. } => "import",
            Self::Return { .. } => "return",
            Self::EmailsSent { .. } => "emails_sent",
            Self::Reset { .. } => "reset",
        }
    }
}
