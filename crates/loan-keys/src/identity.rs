//! Identity keys for students and physical copies.
//!
//! Display values keep whatever casing and spacing the librarian typed; every
//! lookup and equality check goes through the normalised form instead.

/// Normalise a student email for comparison: trimmed and lower-cased.
///
/// # Examples
/// ```
/// use loan_keys::normalize_email;
///
/// assert_eq!(normalize_email("  Aditi23@BITS.edu "), "aditi23@bits.edu");
/// ```
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalise a copy identifier for comparison: trimmed and lower-cased.
///
/// # Examples
/// ```
/// use loan_keys::normalize_copy_id;
///
/// assert_eq!(normalize_copy_id("X-1"), normalize_copy_id(" x-1"));
/// ```
#[must_use]
pub fn normalize_copy_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Structural email check: a non-empty local part, a single `@`, and a domain
/// holding a `.` with text on both sides. Whitespace anywhere inside the
/// trimmed value is rejected.
///
/// This is deliberately loose; it only catches obviously malformed input.
///
/// # Examples
/// ```
/// use loan_keys::is_valid_email_shape;
///
/// assert!(is_valid_email_shape("a@b.com"));
/// assert!(!is_valid_email_shape("a@b"));
/// ```
#[must_use]
pub fn is_valid_email_shape(raw: &str) -> bool {
    let candidate = raw.trim();
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}
