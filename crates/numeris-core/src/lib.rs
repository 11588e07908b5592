//! # Numeris Core
//!
//! Input validation and number-theory predicates for the Numeris
//! number classification service.
//!
//! This crate is pure: no I/O, no async, no global state. It provides:
//!
//! - [`validate`] - Turns a raw query value into an `i32` or a [`ValidationError`]
//! - [`predicates`] - `is_prime`, `is_perfect`, `is_armstrong`, `digit_sum`, `parity`
//! - [`Classification`] - The computed properties of a single number
//! - [`ClassificationResult`] - A classification merged with its fun fact
//!
//! # Example
//!
//! ```
//! use numeris_core::{validate, Classification, Property};
//!
//! let n = validate(Some(" 153 ")).unwrap();
//! let classification = Classification::of(n);
//!
//! assert!(!classification.is_prime);
//! assert_eq!(classification.digit_sum, 9);
//! assert_eq!(classification.properties, vec![Property::Armstrong, Property::Odd]);
//! ```

#![doc(html_root_url = "https://docs.rs/numeris-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod classification;
mod error;
pub mod predicates;
mod validate;

pub use classification::{Classification, ClassificationResult, Property};
pub use error::{ValidationError, ValidationErrorBody, MISSING_ECHO};
pub use predicates::{digit_sum, is_armstrong, is_perfect, is_prime, parity, Parity};
pub use validate::validate;

/// Fact text used whenever the trivia lookup produced nothing usable.
pub const FALLBACK_FACT: &str = "No fact available";
