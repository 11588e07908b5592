//! In-memory fact sources for tests.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use numeris_facts::{fixtures::FailingFactSource, FactFetcher};
//!
//! # tokio_test::block_on(async {
//! let fetcher = FactFetcher::new(Arc::new(FailingFactSource::new()), Duration::from_secs(1));
//! assert!(fetcher.lookup(42).await.is_fallback());
//! # });
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::FactError;
use crate::source::{BoxFuture, FactSource};

/// Always returns the same text and counts how often it was asked.
#[derive(Debug)]
pub struct StaticFactSource {
    text: String,
    calls: AtomicUsize,
}

impl StaticFactSource {
    /// Creates a source returning `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the number of fetches served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FactSource for StaticFactSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&self, _number: i32) -> BoxFuture<'_, Result<String, FactError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = self.text.clone();
        Box::pin(async move { Ok(text) })
    }
}

/// Always fails as if the service returned `503`.
#[derive(Debug, Default)]
pub struct FailingFactSource {
    calls: AtomicUsize,
}

impl FailingFactSource {
    /// Creates a failing source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of fetches attempted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FactSource for FailingFactSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn fetch(&self, _number: i32) -> BoxFuture<'_, Result<String, FactError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Err(FactError::Status { status: 503 }) })
    }
}

/// Sleeps before answering.
#[derive(Debug)]
pub struct SlowFactSource {
    delay: Duration,
    text: String,
}

impl SlowFactSource {
    /// Creates a source that waits `delay` and then returns `text`.
    pub fn new(delay: Duration, text: impl Into<String>) -> Self {
        Self {
            delay,
            text: text.into(),
        }
    }
}

impl FactSource for SlowFactSource {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn fetch(&self, _number: i32) -> BoxFuture<'_, Result<String, FactError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(self.text.clone())
        })
    }
}
