//! Canonical comparison keys for library loan records.
//!
//! Loan rows arrive from spreadsheets and hand-typed forms, so the same copy
//! or student may be spelt with stray whitespace or different casing, and the
//! same calendar day may arrive as text or as a spreadsheet serial number.
//! This crate turns those raw values into keys that compare reliably. It has
//! no knowledge of the ledger itself and performs no I/O.
//!
//! # Example
//!
//! ```
//! use loan_keys::{DateInput, is_valid_email_shape, normalize_copy_id, parse_canonical_date};
//!
//! assert_eq!(normalize_copy_id("  SIGSYS-3e#00020 "), "sigsys-3e#00020");
//! assert!(is_valid_email_shape("srao22@bits.edu"));
//!
//! let from_text = parse_canonical_date(DateInput::Text("2025-12-01")).expect("text date");
//! let from_serial = parse_canonical_date(DateInput::Serial(45992.0)).expect("serial date");
//! assert_eq!(from_text, from_serial);
//! ```

mod date;
mod error;
mod identity;

pub use date::{DateInput, SERIAL_MAX, parse_canonical_date, serial_to_ymd};
pub use error::DateParseError;
pub use identity::{is_valid_email_shape, normalize_copy_id, normalize_email};
