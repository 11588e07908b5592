//! Telemetry error types.

use thiserror::Error;

/// Errors raised while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The Prometheus recorder or exporter could not be installed.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInit(String),

    /// The OTLP pipeline could not be built.
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// A listen address did not parse.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
