//! Timeout and fallback wrapper around a [`FactSource`].

use std::sync::Arc;
use std::time::Duration;

use numeris_core::FALLBACK_FACT;
use tracing::{debug, warn};

use crate::error::FactError;
use crate::source::FactSource;

/// Default fact lookup timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Outcome of a fact lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactLookup {
    /// The source returned a fact.
    Fetched(String),
    /// No fact was available; [`FALLBACK_FACT`] is used instead.
    Fallback,
}

impl FactLookup {
    /// Returns the fact text, or the fallback text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Fetched(text) => text,
            Self::Fallback => FALLBACK_FACT,
        }
    }

    /// Consumes the outcome and returns the text to show the caller.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Fetched(text) => text,
            Self::Fallback => FALLBACK_FACT.to_string(),
        }
    }

    /// Returns `true` if this is the fallback outcome.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }

    /// Returns the metrics label for this outcome.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Fetched(_) => "fetched",
            Self::Fallback => "fallback",
        }
    }
}

/// Looks up facts with a bounded wait; never fails.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use numeris_facts::{fixtures::StaticFactSource, FactFetcher, FactLookup};
///
/// # tokio_test::block_on(async {
/// let fetcher = FactFetcher::new(
///     Arc::new(StaticFactSource::new("a fact")),
///     Duration::from_secs(1),
/// );
/// assert_eq!(fetcher.lookup(1).await, FactLookup::Fetched("a fact".into()));
///
/// let disabled = FactFetcher::disabled();
/// assert_eq!(disabled.lookup(1).await.text(), "No fact available");
/// # });
/// ```
#[derive(Clone)]
pub struct FactFetcher {
    source: Option<Arc<dyn FactSource>>,
    timeout: Duration,
}

impl FactFetcher {
    /// Creates a fetcher over `source` that waits at most `timeout`.
    pub fn new(source: Arc<dyn FactSource>, timeout: Duration) -> Self {
        Self {
            source: Some(source),
            timeout,
        }
    }

    /// Creates a fetcher that always falls back without any I/O.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            source: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Returns `true` if lookups reach a source.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Returns the lookup timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Looks up a fact about `number`.
    ///
    /// Source errors and timeouts are logged at `warn` and become
    /// [`FactLookup::Fallback`].
    pub async fn lookup(&self, number: i32) -> FactLookup {
        let Some(source) = &self.source else {
            return FactLookup::Fallback;
        };

        let result = match tokio::time::timeout(self.timeout, source.fetch(number)).await {
            Ok(result) => result,
            Err(_) => Err(FactError::Timeout(self.timeout)),
        };

        match result {
            Ok(text) => {
                debug!(number, source = source.name(), "fact fetched");
                FactLookup::Fetched(text)
            }
            Err(error) => {
                warn!(
                    number,
                    source = source.name(),
                    kind = error.kind(),
                    error = %error,
                    "fact lookup failed, using fallback"
                );
                FactLookup::Fallback
            }
        }
    }
}

impl std::fmt::Debug for FactFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactFetcher")
            .field("source", &self.source.as_ref().map(|s| s.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
