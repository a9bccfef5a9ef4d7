//! Reminder email log entries.
//!
//! The log is append-only and has no identity key: the same reminder sent
//! twice is recorded twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether a reminder covered one copy or a digest of a student's loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailMode {
    /// One email per overdue copy.
    PerCopy,
    /// One digest email per student.
    PerStudent,
}

/// A loan referenced by a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmailBook {
    /// Book title at the time of sending.
    #[serde(default)]
    pub book_title: String,
    /// Copy identifier.
    #[serde(default)]
    pub copy_uid: String,
    /// Recipient the loan belongs to.
    #[serde(default)]
    pub student_email: String,
}

/// A reminder email as recorded in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmailLogEntry {
    /// Recipient address.
    pub to: String,
    /// Recipient display name.
    #[serde(default)]
    pub name: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Reminder granularity.
    pub mode: EmailMode,
    /// When the reminder was logged.
    #[schema(value_type = String, format = DateTime)]
    pub sent_at: DateTime<Utc>,
    /// Loans covered by the reminder.
    #[serde(default)]
    pub books: Vec<EmailBook>,
    /// Sender override; the configured sender applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// A reminder as submitted by a client, before it is stamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmailDraft {
    /// Recipient address.
    pub to: String,
    /// Recipient display name.
    #[serde(default)]
    pub name: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Reminder granularity.
    pub mode: EmailMode,
    /// Client-side timestamp; the server clock is used when absent.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub sent_at: Option<DateTime<Utc>>,
    /// Loans covered by the reminder.
    #[serde(default)]
    pub books: Vec<EmailBook>,
    /// Sender override.
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailDraft {
    /// Stamp the draft, using `now` when the client sent no timestamp.
    #[must_use]
    pub fn into_entry(self, now: DateTime<Utc>) -> EmailLogEntry {
        EmailLogEntry {
            to: self.to,
            name: self.name,
            subject: self.subject,
            body: self.body,
            mode: self.mode,
            sent_at: self.sent_at.unwrap_or(now),
            books: self.books,
            from: self.from.filter(|from| !from.trim().is_empty()),
        }
    }
}
