//! The fact source capability.

use std::future::Future;
use std::pin::Pin;

use crate::error::FactError;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can produce a trivia string for a number.
///
/// Implementations report failures as [`FactError`]; they never need to
/// apply a fallback themselves.
///
/// # Example
///
/// ```
/// use numeris_facts::{BoxFuture, FactError, FactSource};
///
/// #[derive(Debug)]
/// struct Parroting;
///
/// impl FactSource for Parroting {
///     fn name(&self) -> &'static str {
///         "parroting"
///     }
///
///     fn fetch(&self, number: i32) -> BoxFuture<'_, Result<String, FactError>> {
///         Box::pin(async move { Ok(format!("{number} is a number.")) })
///     }
/// }
/// ```
pub trait FactSource: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the name of this source, used in logs.
    fn name(&self) -> &'static str;

    /// Fetches a fact about `number`.
    fn fetch(&self, number: i32) -> BoxFuture<'_, Result<String, FactError>>;
}
