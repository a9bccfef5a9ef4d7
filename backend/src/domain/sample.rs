//! Built-in demonstration records.

use super::reconcile::{CellValue, RawRecord};

const SAMPLE_ROWS: &[[&str; 7]] = &[
    [
        "srao22@bits.edu",
        "Sahil Rao",
        "Signals & Systems",
        "SIGSYS-3e",
        "SIGSYS-3e#00020",
        "2025-07-28",
        "2025-12-15",
    ],
    [
        "srao22@bits.edu",
        "Sahil Rao",
        "Digital Design",
        "DIGDES-2e",
        "DIGDES-2e#00010",
        "2025-07-28",
        "2025-12-15",
    ],
    [
        "aditi23@bits.edu",
        "Aditi Rao",
        "Linear Algebra",
        "LINALG-5e",
        "LINALG-5e#00052",
        "2025-07-28",
        "2025-12-15",
    ],
];

const SAMPLE_COLUMNS: [&str; 7] = [
    "student_email",
    "student_name",
    "book_title",
    "book_code",
    "copy_uid",
    "issued_at",
    "due_at",
];

/// The three-row sample, shaped like parser output so it takes the normal
/// import path.
#[must_use]
pub fn sample_records() -> Vec<RawRecord> {
    SAMPLE_ROWS
        .iter()
        .map(|row| {
            SAMPLE_COLUMNS
                .iter()
                .zip(row.iter())
                .map(|(column, value)| ((*column).to_owned(), CellValue::from(*value)))
                .chain(std::iter::once((
                    "status".to_owned(),
                    CellValue::from("issued"),
                )))
                .collect()
        })
        .collect()
}
