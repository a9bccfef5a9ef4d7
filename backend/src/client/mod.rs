//! Session-side reconciliation of live pushes.
//!
//! A [`SessionView`] is what one open desk tab believes the ledger looks
//! like. It is hydrated from `GET /api/rows` and `GET /api/emails`, then kept
//! current by feeding it every [`LedgerMessage`] the live channel delivers.
//!
//! Two rules keep the view honest without any conflict resolution:
//! - a push whose version is not newer than the view's is stale and ignored;
//! - reminder pushes tagged with the view's own origin id were already
//!   applied optimistically and are discarded.

use loan_keys::normalize_copy_id;
use uuid::Uuid;

use crate::domain::{EmailLogEntry, LedgerSnapshot, LoanRow, LoanStatus};
use crate::inbound::ws::messages::LedgerMessage;

/// What [`SessionView::apply`] did with a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The view changed.
    Applied,
    /// The push carried a version the view already has; nothing changed.
    StaleVersion,
    /// The push echoed this session's own reminders; nothing changed.
    OwnEcho,
}

/// One session's eventually consistent copy of the ledger and reminder log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    origin_id: String,
    version: u64,
    rows: Vec<LoanRow>,
    email_log: Vec<EmailLogEntry>,
}

impl Default for SessionView {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionView {
    /// Empty view with a fresh random origin id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_origin_id(Uuid::new_v4().to_string())
    }

    /// Empty view tagged with `origin_id`.
    #[must_use]
    pub fn with_origin_id(origin_id: impl Into<String>) -> Self {
        Self {
            origin_id: origin_id.into(),
            version: 0,
            rows: Vec::new(),
            email_log: Vec::new(),
        }
    }

    /// Replace the view with the pulled state.
    ///
    /// A pull older than what pushes already delivered is ignored for the
    /// ledger part; the reminder log has no version and is always replaced.
    pub fn hydrate(&mut self, snapshot: LedgerSnapshot, email_log: Vec<EmailLogEntry>) {
        if snapshot.version >= self.version {
            self.version = snapshot.version;
            self.rows = snapshot.rows;
        }
        self.email_log = email_log;
    }

    /// Add reminders this session just sent, ahead of the server's echo.
    pub fn record_local_emails(&mut self, entries: impl IntoIterator<Item = EmailLogEntry>) {
        self.email_log.extend(entries);
    }

    /// Apply one push.
    pub fn apply(&mut self, message: LedgerMessage) -> ApplyOutcome {
        if let Some(version) = message.version() {
            if version <= self.version {
                return ApplyOutcome::StaleVersion;
            }
        }
        match message {
            LedgerMessage::Import { rows, version } => {
                self.rows = rows;
                self.version = version;
            }
            LedgerMessage::Return { uids, version } => {
                for row in &mut self.rows {
                    if uids.iter().any(|uid| normalize_copy_id(uid) == row.normalized_copy_uid()) {
                        row.set_status(LoanStatus::Returned);
                    }
                }
                self.version = version;
            }
            LedgerMessage::EmailsSent { entries, origin_id } => {
                if origin_id.as_deref() == Some(self.origin_id.as_str()) {
                    return ApplyOutcome::OwnEcho;
                }
                self.email_log.extend(entries);
            }
            LedgerMessage::Reset { version } => {
                self.rows.clear();
                self.email_log.clear();
                self.version = version;
            }
        }
        ApplyOutcome::Applied
    }

    /// Tag sent with this session's reminder requests.
    #[must_use]
    pub fn origin_id(&self) -> &str {
        &self.origin_id
    }

    /// Latest version the view has seen.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Rows as the view sees them.
    #[must_use]
    pub fn rows(&self) -> &[LoanRow] {
        &self.rows
    }

    /// Reminder log as the view sees it, oldest first.
    #[must_use]
    pub fn email_log(&self) -> &[EmailLogEntry] {
        &self.email_log
    }
}
