//! Error types for the loan-keys crate.

use thiserror::Error;

/// Reasons a cell value could not be turned into a canonical date.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateParseError {
    /// The input was empty once trimmed.
    #[error("date value is empty")]
    Empty,

    /// The text did not match any supported calendar layout.
    #[error("unrecognised date text '{input}'")]
    Unrecognised {
        /// The trimmed text that failed to parse.
        input: String,
    },

    /// The spreadsheet serial number lies outside the representable range.
    #[error("spreadsheet serial {serial} is outside the supported range")]
    SerialOutOfRange {
        /// The rejected serial number.
        serial: f64,
    },
}
