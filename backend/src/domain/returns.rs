//! Return workflows expressed as status transitions on the ledger.
//!
//! Both operations are idempotent: returning a copy that is unknown or
//! already returned changes nothing and leaves the version alone.

use loan_keys::{normalize_copy_id, normalize_email};

use super::ledger::Ledger;
use super::loan::LoanStatus;

/// Mark one copy as returned.
///
/// Returns the normalised identifiers that changed: one entry, or none for a
/// no-op.
pub fn return_by_copy(ledger: &mut Ledger, copy_uid: &str) -> Vec<String> {
    let key = normalize_copy_id(copy_uid);
    ledger.set_status(
        |row| row.status() == LoanStatus::Issued && row.normalized_copy_uid() == key,
        LoanStatus::Returned,
    )
}

/// Mark every issued copy held by a student as returned.
///
/// An empty result means the student had nothing outstanding.
pub fn return_all_for_student(ledger: &mut Ledger, student_email: &str) -> Vec<String> {
    let key = normalize_email(student_email);
    ledger.set_status(
        |row| row.status() == LoanStatus::Issued && row.normalized_email() == key,
        LoanStatus::Returned,
    )
}
