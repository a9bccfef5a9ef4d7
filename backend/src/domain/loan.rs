//! Loan rows: one record per physical copy on loan.
//!
//! A [`LoanRow`] carries display values exactly as the librarian supplied
//! them, plus cached normalised keys that every lookup uses. The cached keys
//! are never serialised; they are rebuilt whenever a row is deserialised or
//! its source field changes.

use loan_keys::{normalize_copy_id, normalize_email};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Loan state for a single copy.
///
/// `Issued` is the default when a record does not say otherwise. `Returned`
/// is terminal for the return workflows; only an explicit re-import can put a
/// copy back to `Issued`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// The copy is with the student.
    #[default]
    Issued,
    /// The copy is back on the shelf.
    Returned,
}

impl LoanStatus {
    /// Parse a status cell, ignoring case and surrounding whitespace.
    ///
    /// ```
    /// use loan_ledger::domain::LoanStatus;
    ///
    /// assert_eq!(LoanStatus::parse(" Returned "), Some(LoanStatus::Returned));
    /// assert_eq!(LoanStatus::parse("lost"), None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "issued" => Some(Self::Issued),
            "returned" => Some(Self::Returned),
            _ => None,
        }
    }

    /// Wire spelling of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated incoming record ready to be merged into the ledger.
///
/// Required fields are always present; optional fields are `None` when the
/// source record left them out, in which case a merge keeps the existing
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanPatch {
    /// Student email as supplied (trimmed).
    pub student_email: String,
    /// Physical copy identifier as supplied (trimmed).
    pub copy_uid: String,
    /// Due date in canonical `YYYY-MM-DD` form.
    pub due_at: String,
    /// Student display name.
    pub student_name: Option<String>,
    /// Book title.
    pub book_title: Option<String>,
    /// Edition or catalogue code.
    pub book_code: Option<String>,
    /// Issue date, canonical when parseable, raw text otherwise.
    pub issued_at: Option<String>,
    /// Explicit status from the source record.
    pub status: Option<LoanStatus>,
}

impl LoanPatch {
    /// Normalised copy identifier used as the ledger key.
    #[must_use]
    pub fn normalized_copy_uid(&self) -> String {
        normalize_copy_id(&self.copy_uid)
    }
}

/// One physical copy's loan record.
///
/// # Examples
/// ```
/// use loan_ledger::domain::{LoanPatch, LoanRow, LoanStatus};
///
/// let row = LoanRow::from_patch(LoanPatch {
///     student_email: "A@B.com".to_owned(),
///     copy_uid: "X-1".to_owned(),
///     due_at: "2025-12-01".to_owned(),
///     student_name: None,
///     book_title: None,
///     book_code: None,
///     issued_at: None,
///     status: None,
/// });
/// assert_eq!(row.normalized_copy_uid(), "x-1");
/// assert_eq!(row.status(), LoanStatus::Issued);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "LoanRowRecord")]
pub struct LoanRow {
    student_email: String,
    student_name: String,
    book_title: String,
    book_code: String,
    copy_uid: String,
    issued_at: String,
    due_at: String,
    status: LoanStatus,
    #[serde(skip)]
    normalized_email: String,
    #[serde(skip)]
    normalized_copy_uid: String,
}

impl LoanRow {
    /// Build a fresh row; absent optional fields become empty and the status
    /// defaults to `issued`.
    #[must_use]
    pub fn from_patch(patch: LoanPatch) -> Self {
        let LoanPatch {
            student_email,
            copy_uid,
            due_at,
            student_name,
            book_title,
            book_code,
            issued_at,
            status,
        } = patch;
        Self::from_record(LoanRowRecord {
            student_email,
            student_name: student_name.unwrap_or_default(),
            book_title: book_title.unwrap_or_default(),
            book_code: book_code.unwrap_or_default(),
            copy_uid,
            issued_at: issued_at.unwrap_or_default(),
            due_at,
            status: status.unwrap_or_default(),
        })
    }

    /// Shallow merge: every field present in `patch` overwrites the stored
    /// value, absent fields are kept.
    pub fn merge(&mut self, patch: LoanPatch) {
        let LoanPatch {
            student_email,
            copy_uid,
            due_at,
            student_name,
            book_title,
            book_code,
            issued_at,
            status,
        } = patch;

        self.normalized_email = normalize_email(&student_email);
        self.student_email = student_email;
        self.normalized_copy_uid = normalize_copy_id(&copy_uid);
        self.copy_uid = copy_uid;
        self.due_at = due_at;
        if let Some(value) = student_name {
            self.student_name = value;
        }
        if let Some(value) = book_title {
            self.book_title = value;
        }
        if let Some(value) = book_code {
            self.book_code = value;
        }
        if let Some(value) = issued_at {
            self.issued_at = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
    }

    pub(crate) fn set_status(&mut self, status: LoanStatus) {
        self.status = status;
    }

    fn from_record(record: LoanRowRecord) -> Self {
        Self {
            normalized_email: normalize_email(&record.student_email),
            normalized_copy_uid: normalize_copy_id(&record.copy_uid),
            student_email: record.student_email,
            student_name: record.student_name,
            book_title: record.book_title,
            book_code: record.book_code,
            copy_uid: record.copy_uid,
            issued_at: record.issued_at,
            due_at: record.due_at,
            status: record.status,
        }
    }

    /// Student email as supplied.
    #[must_use]
    pub fn student_email(&self) -> &str {
        &self.student_email
    }

    /// Student display name; may be empty.
    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Book title.
    #[must_use]
    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    /// Edition or catalogue code.
    #[must_use]
    pub fn book_code(&self) -> &str {
        &self.book_code
    }

    /// Copy identifier as supplied.
    #[must_use]
    pub fn copy_uid(&self) -> &str {
        &self.copy_uid
    }

    /// Issue date.
    #[must_use]
    pub fn issued_at(&self) -> &str {
        &self.issued_at
    }

    /// Due date in canonical form.
    #[must_use]
    pub fn due_at(&self) -> &str {
        &self.due_at
    }

    /// Current loan status.
    #[must_use]
    pub fn status(&self) -> LoanStatus {
        self.status
    }

    /// Lower-cased, trimmed email used for student lookups.
    #[must_use]
    pub fn normalized_email(&self) -> &str {
        &self.normalized_email
    }

    /// Lower-cased, trimmed copy identifier; the ledger key.
    #[must_use]
    pub fn normalized_copy_uid(&self) -> &str {
        &self.normalized_copy_uid
    }
}

/// Persisted and wire shape of a row. Unknown keys, including cached keys
/// written by older tools, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoanRowRecord {
    student_email: String,
    student_name: String,
    book_title: String,
    book_code: String,
    copy_uid: String,
    issued_at: String,
    due_at: String,
    status: LoanStatus,
}

impl From<LoanRowRecord> for LoanRow {
    fn from(value: LoanRowRecord) -> Self {
        Self::from_record(value)
    }
}

/// The full ledger state at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LedgerSnapshot {
    /// Monotonic version; bumps once per successful mutation.
    pub version: u64,
    /// Rows in insertion order.
    pub rows: Vec<LoanRow>,
}
