//! Raw input validation.

use crate::error::ValidationError;

/// Validates a raw `number` query value.
///
/// - `None`, empty, or whitespace-only input is [`ValidationError::Missing`].
/// - Otherwise the input is trimmed and parsed as a signed base-10 `i32`.
///   A leading `+` or `-` is accepted; fractions, inner whitespace, and
///   values outside the `i32` range are rejected.
/// - A parse failure is [`ValidationError::NotInteger`] carrying the
///   original, untrimmed input.
///
/// # Example
///
/// ```
/// use numeris_core::{validate, ValidationError};
///
/// assert_eq!(validate(Some(" -42 ")), Ok(-42));
/// assert_eq!(validate(Some("   ")), Err(ValidationError::Missing));
/// assert_eq!(validate(Some("4.2")), Err(ValidationError::not_integer("4.2")));
/// ```
pub fn validate(raw: Option<&str>) -> Result<i32, ValidationError> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(ValidationError::Missing),
    };

    raw.trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::not_integer(raw))
}
