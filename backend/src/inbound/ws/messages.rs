//! Wire-level message definitions for the live channel.
//!
//! Every committed [`LedgerEvent`] is turned into one of these payloads and
//! serialised as a JSON text frame tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::domain::{EmailLogEntry, LedgerEvent, LoanRow};

/// Server-to-session push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerMessage {
    /// Full row set after an import or sample load.
    Import { rows: Vec<LoanRow>, version: u64 },
    /// Normalised copy ids that just became `returned`.
    Return { uids: Vec<String>, version: u64 },
    /// New reminder log entries, tagged with the sender's origin id.
    EmailsSent {
        entries: Vec<EmailLogEntry>,
        #[serde(
            rename = "originId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        origin_id: Option<String>,
    },
    /// Rows and reminder log were cleared.
    Reset { version: u64 },
}

impl LedgerMessage {
    /// Ledger version carried by the message; reminder pushes carry none.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        match self {
            Self::Import { version, .. } | Self::Return { version, .. } | Self::Reset { version } => {
                Some(*version)
            }
            Self::EmailsSent { .. } => None,
        }
    }
}

impl From<&LedgerEvent> for LedgerMessage {
    fn from(event: &LedgerEvent) -> Self {
        match event {
            LedgerEvent::Import { rows, version } => Self::Import {
                rows: rows.clone(),
                version: *version,
            },
            LedgerEvent::Return { uids, version } => Self::Return {
                uids: uids.clone(),
                version: *version,
            },
            LedgerEvent::EmailsSent { entries, origin_id } => Self::EmailsSent {
                entries: entries.clone(),
                origin_id: origin_id.clone(),
            },
            LedgerEvent::Reset { version } => Self::Reset { version: *version },
        }
    }
}
