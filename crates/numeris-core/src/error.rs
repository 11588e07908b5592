//! Validation error types.
//!
//! The classifier has exactly two input failure modes. Both map to
//! `400 Bad Request` and are rendered with the same two-field body:
//!
//! | Cause | `number` field | `error` field |
//! |-------|----------------|---------------|
//! | Missing or blank input | `"missing"` | `true` |
//! | Not a base-10 `i32` | the original raw value | `true` |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value echoed back in place of the input when it was missing or blank.
pub const MISSING_ECHO: &str = "missing";

/// Errors produced while validating the raw `number` input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input was absent, empty, or whitespace only.
    #[error("number is missing")]
    Missing,

    /// The input was present but did not parse as a base-10 `i32`.
    #[error("'{raw}' is not a valid integer")]
    NotInteger {
        /// The original, untrimmed input.
        raw: String,
    },
}

impl ValidationError {
    /// Creates a not-an-integer error for the given raw input.
    pub fn not_integer(raw: impl Into<String>) -> Self {
        Self::NotInteger { raw: raw.into() }
    }

    /// Returns the value echoed back to the caller in the `number` field.
    #[must_use]
    pub fn echoed_input(&self) -> &str {
        match self {
            Self::Missing => MISSING_ECHO,
            Self::NotInteger { raw } => raw,
        }
    }

    /// Returns a stable, low-cardinality reason label for logs and metrics.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::NotInteger { .. } => "not_integer",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Converts the error into its response body.
    #[must_use]
    pub fn to_body(&self) -> ValidationErrorBody {
        ValidationErrorBody {
            number: self.echoed_input().to_string(),
            error: true,
        }
    }
}

/// Response body for a rejected input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrorBody {
    /// Either `"missing"` or the original raw input.
    pub number: String,
    /// Always `true`.
    pub error: bool,
}

impl From<&ValidationError> for ValidationErrorBody {
    fn from(err: &ValidationError) -> Self {
        err.to_body()
    }
}
