//! Domain primitives, aggregates, and services.
//!
//! Purpose: hold the loan ledger and everything that may change it. Nothing
//! here knows about HTTP, WebSockets, or the filesystem; those sit behind the
//! traits in [`ports`].
//!
//! Public surface:
//! - [`LoanRow`], [`LoanStatus`], [`LedgerSnapshot`]: the ledger's data.
//! - [`Ledger`]: the keyed store and its version counter.
//! - [`validate_batch`]: all-or-nothing record validation.
//! - [`return_by_copy`], [`return_all_for_student`]: return workflows.
//! - [`LedgerService`]: the driving-port implementation.
//! - [`Error`], [`ErrorCode`], [`TraceId`]: error payload and correlation.

pub mod email_log;
pub mod error;
pub mod events;
pub mod ledger;
pub mod ledger_service;
pub mod loan;
pub mod ports;
pub mod reconcile;
pub mod returns;
pub mod sample;
pub mod trace_id;

pub use self::email_log::{EmailBook, EmailDraft, EmailLogEntry, EmailMode};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::LedgerEvent;
pub use self::ledger::{Ledger, ValidatedBatch};
pub use self::ledger_service::{LedgerService, RESET_CONFIRMATION};
pub use self::loan::{LedgerSnapshot, LoanPatch, LoanRow, LoanStatus};
pub use self::reconcile::{
    CellValue, ImportSource, RawRecord, RowError, RowErrorKind, validate_batch,
};
pub use self::returns::{return_all_for_student, return_by_copy};
pub use self::sample::sample_records;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use loan_ledger::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<u64> {
///     Err(Error::invalid_request("copy_uid required"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
