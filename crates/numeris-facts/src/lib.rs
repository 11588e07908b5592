//! # Numeris Facts
//!
//! Best-effort trivia lookup for classified numbers.
//!
//! A [`FactSource`] produces a fact or a [`FactError`]. The
//! [`FactFetcher`] wraps a source with a timeout and converts every failure
//! into [`FactLookup::Fallback`], so a lookup can never fail a request.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use numeris_facts::{FactFetcher, NumbersApiClient};
//!
//! # async fn example() -> Result<(), numeris_facts::FactError> {
//! let client = NumbersApiClient::builder()
//!     .base_url("http://numbersapi.com")
//!     .timeout(Duration::from_secs(3))
//!     .build()?;
//! let fetcher = FactFetcher::new(Arc::new(client), Duration::from_secs(3));
//!
//! let fact = fetcher.lookup(153).await;
//! println!("{}", fact.text());
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/numeris-facts/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod fetcher;
mod numbers_api;
mod source;

pub mod fixtures;

pub use error::{FactError, FactResult};
pub use fetcher::{FactFetcher, FactLookup, DEFAULT_TIMEOUT};
pub use numbers_api::{
    NumbersApiClient, NumbersApiClientBuilder, DEFAULT_BASE_URL, USER_AGENT_VALUE,
};
pub use source::{BoxFuture, FactSource};
