//! Canonical `YYYY-MM-DD` dates from spreadsheet cells.
//!
//! Spreadsheet parsers hand dates over either as text or as a serial day
//! number counted from the 1900 epoch. Both paths land on the same string so
//! that a date typed by hand and the same date exported by a spreadsheet
//! compare equal.
//!
//! The 1900 date system treats 1900 as a leap year. Serial 60 therefore
//! decodes to the fictitious `1900-02-29`, and serials 1 to 59 sit one day
//! later on the real calendar than a plain day count from 1899-12-30 would
//! suggest.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::DateParseError;

/// Largest serial the 1900 date system can express (9999-12-31).
pub const SERIAL_MAX: f64 = 2_958_465.0;

/// Serial number of the phantom 29 February 1900.
const PHANTOM_LEAP_DAY: i64 = 60;

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%a %b %d %Y",
];

const DATE_TIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A raw date cell as delivered by the tabular parser or a form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    /// Free-form calendar text such as `2025-12-01` or `Dec 1, 2025`.
    Text(&'a str),
    /// Spreadsheet serial day number; any fractional time part is ignored.
    Serial(f64),
}

/// Parse a date cell into canonical `YYYY-MM-DD` form.
///
/// # Errors
/// Returns [`DateParseError`] when the text is empty or unrecognised, or when
/// a serial number falls outside `1..=SERIAL_MAX`.
///
/// # Examples
/// ```
/// use loan_keys::{DateInput, parse_canonical_date};
///
/// assert_eq!(
///     parse_canonical_date(DateInput::Text("December 1, 2025")).as_deref(),
///     Ok("2025-12-01")
/// );
/// assert_eq!(
///     parse_canonical_date(DateInput::Serial(60.0)).as_deref(),
///     Ok("1900-02-29")
/// );
/// ```
pub fn parse_canonical_date(input: DateInput<'_>) -> Result<String, DateParseError> {
    match input {
        DateInput::Serial(serial) => {
            let (year, month, day) = serial_to_ymd(serial)?;
            Ok(format!("{year:04}-{month:02}-{day:02}"))
        }
        DateInput::Text(text) => parse_text(text).map(|date| date.format("%Y-%m-%d").to_string()),
    }
}

/// Decode a 1900-system serial number into `(year, month, day)`.
///
/// # Errors
/// Returns [`DateParseError::SerialOutOfRange`] for non-finite values and for
/// serials below 1 or above [`SERIAL_MAX`].
///
/// # Examples
/// ```
/// use loan_keys::serial_to_ymd;
///
/// assert_eq!(serial_to_ymd(1.0), Ok((1900, 1, 1)));
/// assert_eq!(serial_to_ymd(61.0), Ok((1900, 3, 1)));
/// ```
pub fn serial_to_ymd(serial: f64) -> Result<(i32, u32, u32), DateParseError> {
    let whole = serial.floor();
    if !whole.is_finite() || !(1.0..=SERIAL_MAX).contains(&whole) {
        return Err(DateParseError::SerialOutOfRange { serial });
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range checked above; the value is a whole number below 3 million"
    )]
    let days = whole as i64;

    if days == PHANTOM_LEAP_DAY {
        return Ok((1900, 2, 29));
    }

    let epoch = if days < PHANTOM_LEAP_DAY {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    }
    .ok_or(DateParseError::SerialOutOfRange { serial })?;

    let date = epoch
        .checked_add_signed(Duration::days(days))
        .ok_or(DateParseError::SerialOutOfRange { serial })?;
    Ok(ymd(date))
}

fn ymd(date: NaiveDate) -> (i32, u32, u32) {
    use chrono::Datelike;
    (date.year(), date.month(), date.day())
}

fn parse_text(raw: &str) -> Result<NaiveDate, DateParseError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(stamp.with_timezone(&Utc).date_naive());
    }

    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
        .or_else(|| {
            DATE_TIME_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
                .map(|stamp| stamp.date())
        })
        .ok_or_else(|| DateParseError::Unrecognised {
            input: text.to_owned(),
        })
}
