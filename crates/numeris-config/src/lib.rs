//! Typed configuration for the Numeris service.
//!
//! Configuration is layered: defaults (or a preset), then an optional TOML
//! or JSON file, then `.env`, then `NUMERIS__SECTION__KEY` environment
//! variables. Every section rejects unknown fields.
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! service_name = "numeris"
//!
//! [facts]
//! enabled = true
//! base_url = "http://numbersapi.com"
//! timeout_ms = 3000
//! pool_max_idle_per_host = 16
//!
//! [cors]
//! allow_any_origin = true
//! allowed_methods = ["*"]
//! allowed_headers = ["*"]
//! max_age_secs = 86400
//!
//! [telemetry]
//! environment = "production"
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//!
//! [telemetry.tracing]
//! enabled = false
//! otlp_endpoint = "http://localhost:4317"
//! sampling_ratio = 1.0
//! ```
//!
//! Environment overrides, for example:
//!
//! - `NUMERIS__SERVER__HTTP_ADDR=127.0.0.1:9000`
//! - `NUMERIS__FACTS__TIMEOUT_MS=500`
//! - `NUMERIS__CORS__ALLOWED_ORIGINS=https://a.example,https://b.example`
//! - `NUMERIS__TELEMETRY__LOGGING__LEVEL=debug`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{NumerisConfig, NumerisConfigBuilder};
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    CorsSection, FactsSection, LogFormat, LoggingSection, MetricsSection, ServerSection,
    TelemetrySection, TracingSection,
};
