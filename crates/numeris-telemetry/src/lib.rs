//! Observability for Numeris.
//!
//! - **Logging**: JSON or pretty structured logs via `tracing-subscriber`
//! - **Metrics**: Prometheus scrape endpoint via the `metrics` facade
//! - **Tracing**: OpenTelemetry spans exported over OTLP, with W3C
//!   trace-context propagation
//!
//! # Example
//!
//! ```rust,ignore
//! use numeris_telemetry::{init_telemetry, LogConfig, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TelemetryConfig::builder()
//!         .service_name("numeris")
//!         .logging(LogConfig::production())
//!         .build();
//!
//!     let _guard = init_telemetry(&config)?;
//!     tracing::info!("telemetry ready");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod tracing;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use self::metrics::{init_metrics, InFlightGuard, MetricsConfig};
pub use self::tracing::{extract_context, init_tracing, inject_current_context, RequestTrace, TracingConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Flushes and shuts down the tracer provider on drop.
///
/// Keep it alive for the lifetime of the process.
#[must_use = "dropping the guard shuts down tracing immediately"]
pub struct TelemetryGuard {
    tracer_provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl TelemetryGuard {
    /// Wraps an optional tracer provider.
    pub fn new(tracer_provider: Option<opentelemetry_sdk::trace::TracerProvider>) -> Self {
        Self { tracer_provider }
    }

    /// Returns `true` if spans are being exported.
    pub fn tracing_enabled(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            for result in provider.force_flush() {
                if let Err(e) = result {
                    eprintln!("Error flushing tracer provider: {e}");
                }
            }
            if let Err(e) = provider.shutdown() {
                eprintln!("Error shutting down tracer provider: {e}");
            }
        }
    }
}

/// Initializes logging, then metrics, then tracing.
///
/// Must be called from within a Tokio runtime when metrics or tracing are
/// enabled.
///
/// # Errors
///
/// Returns the first subsystem error encountered.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<TelemetryGuard> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    let tracer_provider = init_tracing(&config.tracing)?;

    Ok(TelemetryGuard::new(tracer_provider))
}
