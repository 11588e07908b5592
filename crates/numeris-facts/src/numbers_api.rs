//! Numbers API client.
//!
//! Issues `GET {base_url}/{n}/math?json` and reads the `text` field of the
//! JSON reply:
//!
//! ```json
//! { "text": "153 is a narcissistic number.", "number": 153, "found": true, "type": "math" }
//! ```
//!
//! Only `text` is consumed; every other field is ignored.

use std::time::Duration;

use http::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{FactError, FactResult};
use crate::source::{BoxFuture, FactSource};

/// Default Numbers API base URL.
pub const DEFAULT_BASE_URL: &str = "http://numbersapi.com";

/// User agent sent with every outbound request.
pub const USER_AGENT_VALUE: &str = concat!("numeris/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct FactResponse {
    #[serde(default)]
    text: Option<String>,
}

/// HTTP client for the Numbers API.
///
/// The underlying [`reqwest::Client`] holds a connection pool; build one
/// client at startup and share it.
#[derive(Debug, Clone)]
pub struct NumbersApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl NumbersApiClient {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn builder() -> NumbersApiClientBuilder {
        NumbersApiClientBuilder::default()
    }

    /// Creates a client against `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> FactResult<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Returns the base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-request timeout applied by the HTTP client.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the URL queried for `number`.
    #[must_use]
    pub fn fact_url(&self, number: i32) -> String {
        format!("{}/{}/math?json", self.base_url, number)
    }

    /// Fetches the math fact for `number`.
    pub async fn fetch_text(&self, number: i32) -> FactResult<String> {
        let url = self.fact_url(number);

        let mut headers = HeaderMap::new();
        numeris_telemetry::inject_current_context(&mut headers);

        let response = self.client.get(&url).headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: FactResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                FactError::Decode(e)
            } else {
                FactError::Request(e)
            }
        })?;
        parsed.text.ok_or(FactError::MissingText)
    }
}

impl FactSource for NumbersApiClient {
    fn name(&self) -> &'static str {
        "numbers_api"
    }

    fn fetch(&self, number: i32) -> BoxFuture<'_, Result<String, FactError>> {
        Box::pin(self.fetch_text(number))
    }
}

/// Builder for [`NumbersApiClient`].
#[derive(Debug, Clone)]
pub struct NumbersApiClientBuilder {
    base_url: String,
    timeout: Duration,
    pool_max_idle_per_host: usize,
}

impl Default for NumbersApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(3000),
            pool_max_idle_per_host: 16,
        }
    }
}

impl NumbersApiClientBuilder {
    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of idle pooled connections per host.
    #[must_use]
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::ClientBuild`] if the HTTP client cannot be created.
    pub fn build(self) -> FactResult<NumbersApiClient> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .default_headers(default_headers)
            .build()
            .map_err(|e| FactError::client_build(e.to_string()))?;

        Ok(NumbersApiClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        })
    }
}
