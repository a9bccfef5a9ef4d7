//! Validation of incoming loan records.
//!
//! Records arrive either from a parsed spreadsheet or from the manual entry
//! form. Each record is checked in isolation, then the batch is accepted or
//! rejected as a whole: a single bad record rejects the batch, and the caller
//! receives every row-level error so the source can be fixed and resubmitted.

use std::collections::{BTreeMap, HashSet};

use loan_keys::{DateInput, is_valid_email_shape, normalize_copy_id, parse_canonical_date};
use serde::{Deserialize, Serialize};

use super::ledger::ValidatedBatch;
use super::loan::{LoanPatch, LoanStatus};

/// A single cell as produced by the tabular parser.
///
/// Spreadsheet dates arrive as serial day numbers, so numbers are kept as
/// numbers until the target field is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A blank cell.
    Empty,
    /// A boolean cell.
    Bool(bool),
    /// A numeric cell, including date serials.
    Number(f64),
    /// A text cell.
    Text(String),
}

impl CellValue {
    fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.trim().to_owned(),
        }
    }

    fn to_date(&self) -> Option<String> {
        let input = match self {
            Self::Number(serial) => DateInput::Serial(*serial),
            Self::Text(text) => DateInput::Text(text),
            Self::Empty | Self::Bool(_) => return None,
        };
        parse_canonical_date(input).ok()
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One incoming record keyed by column header.
pub type RawRecord = BTreeMap<String, CellValue>;

/// Where a batch came from; decides row numbering and strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    /// Rows parsed from a spreadsheet; row numbers account for the header.
    Spreadsheet,
    /// A hand-entered record; every field is required.
    Manual,
}

impl ImportSource {
    const fn row_number(self, position: usize) -> usize {
        match self {
            Self::Spreadsheet => position + 2,
            Self::Manual => position + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    StudentEmail,
    StudentName,
    BookTitle,
    BookCode,
    CopyUid,
    IssuedAt,
    DueAt,
    Status,
}

impl Field {
    const fn name(self) -> &'static str {
        match self {
            Self::StudentEmail => "student_email",
            Self::StudentName => "student_name",
            Self::BookTitle => "book_title",
            Self::BookCode => "book_code",
            Self::CopyUid => "copy_uid",
            Self::IssuedAt => "issued_at",
            Self::DueAt => "due_at",
            Self::Status => "status",
        }
    }
}

/// Accepted headers per field, in precedence order.
const COLUMN_ALIASES: &[(Field, &[&str])] = &[
    (Field::StudentEmail, &["student_email", "email", "student"]),
    (Field::StudentName, &["student_name", "name"]),
    (Field::BookTitle, &["book_title", "title"]),
    (Field::BookCode, &["book_code", "code"]),
    (Field::CopyUid, &["copy_uid", "copy"]),
    (Field::IssuedAt, &["issued_at", "issued"]),
    (Field::DueAt, &["due_at", "due"]),
    (Field::Status, &["status"]),
];

/// Fields the manual form must fill, in the order they are checked.
const MANUAL_REQUIRED: &[Field] = &[
    Field::StudentEmail,
    Field::StudentName,
    Field::BookTitle,
    Field::BookCode,
    Field::CopyUid,
    Field::IssuedAt,
    Field::DueAt,
];

/// First non-blank cell among the field's aliases.
fn lookup(record: &RawRecord, field: Field) -> Option<&CellValue> {
    COLUMN_ALIASES
        .iter()
        .filter(|(candidate, _)| *candidate == field)
        .flat_map(|(_, aliases)| aliases.iter())
        .filter_map(|alias| record.get(*alias))
        .find(|cell| !cell.is_blank())
}

fn text(record: &RawRecord, field: Field) -> Option<String> {
    lookup(record, field).map(CellValue::to_text)
}

/// Why a single record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowErrorKind {
    /// A required field was absent or blank.
    #[error("missing {field}")]
    Missing {
        /// Canonical field name.
        field: &'static str,
    },
    /// The student email failed the shape check.
    #[error("invalid student_email")]
    InvalidEmail,
    /// The due date could not be parsed.
    #[error("invalid due_at date")]
    InvalidDueDate,
    /// The status was neither `issued` nor `returned`.
    #[error("invalid status")]
    InvalidStatus,
    /// The copy already appeared earlier in the same batch.
    #[error("duplicate copy_uid within file ({copy_uid})")]
    DuplicateCopy {
        /// Copy identifier as written in the later record.
        copy_uid: String,
    },
}

/// A row-numbered validation failure.
///
/// # Examples
/// ```
/// use loan_ledger::domain::{RowError, RowErrorKind};
///
/// let error = RowError::new(2, RowErrorKind::InvalidEmail);
/// assert_eq!(error.to_string(), "Row 2: invalid student_email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Row {row}: {kind}")]
pub struct RowError {
    row: usize,
    kind: RowErrorKind,
}

impl RowError {
    /// Pair a failure with its row number.
    #[must_use]
    pub const fn new(row: usize, kind: RowErrorKind) -> Self {
        Self { row, kind }
    }

    /// One-based row number as the user sees it.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// The failure itself.
    #[must_use]
    pub const fn kind(&self) -> &RowErrorKind {
        &self.kind
    }
}

/// Validate `records` as one all-or-nothing batch.
///
/// Each record reports at most its first failure. A copy identifier counts
/// as seen as soon as it is present, so repeating it later in the batch is a
/// duplicate even if the first occurrence failed a later check.
///
/// # Errors
/// Returns every row-level failure when any record is rejected.
pub fn validate_batch(
    records: &[RawRecord],
    source: ImportSource,
) -> Result<ValidatedBatch, Vec<RowError>> {
    let mut seen = HashSet::new();
    let mut patches = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (position, record) in records.iter().enumerate() {
        match validate_record(record, source, &mut seen) {
            Ok(patch) => patches.push(patch),
            Err(kind) => errors.push(RowError::new(source.row_number(position), kind)),
        }
    }

    if errors.is_empty() {
        Ok(ValidatedBatch::new(patches))
    } else {
        Err(errors)
    }
}

fn validate_record(
    record: &RawRecord,
    source: ImportSource,
    seen: &mut HashSet<String>,
) -> Result<LoanPatch, RowErrorKind> {
    if source == ImportSource::Manual {
        if let Some(field) = MANUAL_REQUIRED
            .iter()
            .find(|field| lookup(record, **field).is_none())
        {
            return Err(RowErrorKind::Missing {
                field: field.name(),
            });
        }
    }

    let student_email = text(record, Field::StudentEmail).ok_or(RowErrorKind::Missing {
        field: Field::StudentEmail.name(),
    })?;
    if !is_valid_email_shape(&student_email) {
        return Err(RowErrorKind::InvalidEmail);
    }

    let copy_uid = text(record, Field::CopyUid).ok_or(RowErrorKind::Missing {
        field: Field::CopyUid.name(),
    })?;
    if !seen.insert(normalize_copy_id(&copy_uid)) {
        return Err(RowErrorKind::DuplicateCopy { copy_uid });
    }

    let due_at = lookup(record, Field::DueAt)
        .ok_or(RowErrorKind::Missing {
            field: Field::DueAt.name(),
        })?
        .to_date()
        .ok_or(RowErrorKind::InvalidDueDate)?;

    let status = text(record, Field::Status)
        .map(|raw| LoanStatus::parse(&raw).ok_or(RowErrorKind::InvalidStatus))
        .transpose()?;

    let issued_at =
        lookup(record, Field::IssuedAt).map(|cell| cell.to_date().unwrap_or_else(|| cell.to_text()));

    Ok(LoanPatch {
        student_email,
        copy_uid,
        due_at,
        student_name: text(record, Field::StudentName),
        book_title: text(record, Field::BookTitle),
        book_code: text(record, Field::BookCode),
        issued_at,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn record(cells: &[(&str, CellValue)]) -> RawRecord {
        cells
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    #[fixture]
    fn valid() -> RawRecord {
        record(&[
            ("student_email", "a@b.com".into()),
            ("copy_uid", "X-1".into()),
            ("due_at", "2025-12-01".into()),
        ])
    }

    fn messages(errors: &[RowError]) -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    fn accepts_minimal_spreadsheet_record(valid: RawRecord) {
        let batch = validate_batch(&[valid], ImportSource::Spreadsheet).expect("valid batch");
        let patch = batch.patches().first().expect("one patch");
        assert_eq!(patch.due_at, "2025-12-01");
        assert_eq!(patch.status, None);
        assert_eq!(patch.student_name, None);
    }

    #[rstest]
    fn aliases_resolve_first_non_blank() {
        let raw = record(&[
            ("student_email", "  ".into()),
            ("email", CellValue::Empty),
            ("student", "Alias@B.com".into()),
            ("copy", "C-9".into()),
            ("title", "Linear Algebra".into()),
            ("due", 45992.0.into()),
        ]);
        let batch = validate_batch(&[raw], ImportSource::Spreadsheet).expect("valid batch");
        let patch = batch.patches().first().expect("one patch");
        assert_eq!(patch.student_email, "Alias@B.com");
        assert_eq!(patch.copy_uid, "C-9");
        assert_eq!(patch.book_title.as_deref(), Some("Linear Algebra"));
        assert_eq!(patch.due_at, "2025-12-01");
    }

    #[rstest]
    fn numeric_non_date_cells_become_text(valid: RawRecord) {
        let mut raw = valid;
        raw.insert("book_code".to_owned(), 1042.0.into());
        let batch = validate_batch(&[raw], ImportSource::Spreadsheet).expect("valid batch");
        let patch = batch.patches().first().expect("one patch");
        assert_eq!(patch.book_code.as_deref(), Some("1042"));
    }

    #[rstest]
    #[case("issued_at", "2025-07-28", "2025-07-28")]
    #[case("issued_at", "July 28, 2025", "2025-07-28")]
    #[case("issued", "last term", "last term")]
    fn issued_at_is_canonical_when_parseable(
        valid: RawRecord,
        #[case] header: &str,
        #[case] cell: &str,
        #[case] expected: &str,
    ) {
        let mut raw = valid;
        raw.insert(header.to_owned(), cell.into());
        let batch = validate_batch(&[raw], ImportSource::Spreadsheet).expect("valid batch");
        let patch = batch.patches().first().expect("one patch");
        assert_eq!(patch.issued_at.as_deref(), Some(expected));
    }

    #[rstest]
    #[case(&[("copy_uid", "X-1"), ("due_at", "2025-12-01")], "Row 2: missing student_email")]
    #[case(&[("student_email", "not-an-email"), ("copy_uid", "X-1")], "Row 2: invalid student_email")]
    #[case(&[("student_email", "a@b.com"), ("due_at", "2025-12-01")], "Row 2: missing copy_uid")]
    #[case(&[("student_email", "a@b.com"), ("copy_uid", "X-1")], "Row 2: missing due_at")]
    #[case(
        &[("student_email", "a@b.com"), ("copy_uid", "X-1"), ("due_at", "someday")],
        "Row 2: invalid due_at date"
    )]
    #[case(
        &[("student_email", "a@b.com"), ("copy_uid", "X-1"), ("due_at", "2025-12-01"), ("status", "lost")],
        "Row 2: invalid status"
    )]
    fn reports_first_failure_per_record(#[case] cells: &[(&str, &str)], #[case] expected: &str) {
        let raw = cells
            .iter()
            .map(|(key, value)| ((*key).to_owned(), CellValue::from(*value)))
            .collect();
        let errors = validate_batch(&[raw], ImportSource::Spreadsheet).expect_err("invalid");
        assert_eq!(messages(&errors), vec![expected.to_owned()]);
    }

    #[rstest]
    fn one_bad_record_rejects_the_whole_batch(valid: RawRecord) {
        let mut second = valid.clone();
        second.insert("copy_uid".to_owned(), "X-2".into());
        let mut bad = valid.clone();
        bad.insert("copy_uid".to_owned(), "X-3".into());
        bad.insert("student_email".to_owned(), "broken".into());

        let errors =
            validate_batch(&[valid, second, bad], ImportSource::Spreadsheet).expect_err("invalid");
        assert_eq!(messages(&errors), vec!["Row 4: invalid student_email".to_owned()]);
    }

    #[rstest]
    fn duplicate_copy_reported_with_raw_value(valid: RawRecord) {
        let mut repeat = valid.clone();
        repeat.insert("copy_uid".to_owned(), " x-1".into());
        let errors = validate_batch(&[valid, repeat], ImportSource::Spreadsheet).expect_err("dup");
        assert_eq!(
            messages(&errors),
            vec!["Row 3: duplicate copy_uid within file (x-1)".to_owned()]
        );
    }

    #[rstest]
    fn copy_is_seen_even_when_first_occurrence_fails(valid: RawRecord) {
        let mut first = valid.clone();
        first.remove("due_at");
        let errors = validate_batch(&[first, valid], ImportSource::Spreadsheet).expect_err("dup");
        assert_eq!(
            messages(&errors),
            vec![
                "Row 2: missing due_at".to_owned(),
                "Row 3: duplicate copy_uid within file (X-1)".to_owned(),
            ]
        );
    }

    #[rstest]
    #[case("Returned", LoanStatus::Returned)]
    #[case(" issued ", LoanStatus::Issued)]
    fn explicit_status_is_kept(valid: RawRecord, #[case] cell: &str, #[case] expected: LoanStatus) {
        let mut raw = valid;
        raw.insert("status".to_owned(), cell.into());
        let batch = validate_batch(&[raw], ImportSource::Spreadsheet).expect("valid batch");
        let patch = batch.patches().first().expect("one patch");
        assert_eq!(patch.status, Some(expected));
    }

    #[rstest]
    fn manual_records_require_every_field(valid: RawRecord) {
        let errors = validate_batch(&[valid], ImportSource::Manual).expect_err("strict");
        assert_eq!(messages(&errors), vec!["Row 1: missing student_name".to_owned()]);
    }

    #[rstest]
    fn manual_record_with_all_fields_passes() {
        let raw = record(&[
            ("student_email", "srao22@bits.edu".into()),
            ("student_name", "Sahil Rao".into()),
            ("book_title", "Signals & Systems".into()),
            ("book_code", "SIGSYS-3e".into()),
            ("copy_uid", "SIGSYS-3e#00020".into()),
            ("issued_at", "2025-07-28".into()),
            ("due_at", "12/15/2025".into()),
        ]);
        let batch = validate_batch(&[raw], ImportSource::Manual).expect("valid batch");
        let patch = batch.patches().first().expect("one patch");
        assert_eq!(patch.due_at, "2025-12-15");
    }

    #[rstest]
    fn empty_batch_is_accepted() {
        let batch = validate_batch(&[], ImportSource::Spreadsheet).expect("empty batch");
        assert!(batch.is_empty());
    }

    #[rstest]
    fn cells_deserialise_from_parser_output() {
        let raw: RawRecord = serde_json::from_value(serde_json::json!({
            "email": "a@b.com",
            "copy": "X-1",
            "due": 45992,
            "issued": null,
            "flag": true
        }))
        .expect("record parses");
        assert_eq!(raw.get("due"), Some(&CellValue::Number(45992.0)));
        assert_eq!(raw.get("issued"), Some(&CellValue::Empty));
        assert_eq!(raw.get("flag"), Some(&CellValue::Bool(true)));
    }
}
