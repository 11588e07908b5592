//! Prometheus metrics.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `numeris_requests_total` | Counter | `route`, `status` |
//! | `numeris_request_duration_seconds` | Histogram | `route` |
//! | `numeris_in_flight_requests` | Gauge | - |
//! | `numeris_validation_failures_total` | Counter | `reason` |
//! | `numeris_fact_lookups_total` | Counter | `outcome` |
//!
//! The recording functions are always safe to call; without an installed
//! recorder they are no-ops.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Total requests by route and status.
pub const REQUESTS_TOTAL: &str = "numeris_requests_total";
/// Request latency by route.
pub const REQUEST_DURATION_SECONDS: &str = "numeris_request_duration_seconds";
/// Requests currently being served.
pub const IN_FLIGHT_REQUESTS: &str = "numeris_in_flight_requests";
/// Rejected inputs by reason.
pub const VALIDATION_FAILURES_TOTAL: &str = "numeris_validation_failures_total";
/// Fact lookups by outcome.
pub const FACT_LOOKUPS_TOTAL: &str = "numeris_fact_lookups_total";

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether the exporter is installed.
    pub enabled: bool,

    /// Listen address of the Prometheus scrape endpoint.
    pub addr: String,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
            // 1ms .. 10s; fact lookups dominate the upper buckets
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

fn builder(config: &MetricsConfig) -> TelemetryResult<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Installs the global recorder and spawns the scrape endpoint.
///
/// Must be called from within a Tokio runtime. Does nothing when metrics
/// are disabled.
///
/// # Errors
///
/// Returns an error if the address is invalid, the buckets are empty, or a
/// recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let (recorder, exporter) = builder(config)?
        .with_http_listener(addr)
        .build()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    metrics::set_global_recorder(recorder)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = exporter.await {
            tracing::error!(error = ?e, "metrics exporter stopped");
        }
    });

    describe_metrics();
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests served");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        IN_FLIGHT_REQUESTS,
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(
        VALIDATION_FAILURES_TOTAL,
        "Rejected classification inputs by reason"
    );
    describe_counter!(FACT_LOOKUPS_TOTAL, "Fact lookups by outcome");
}

/// Records a served request.
pub fn record_request(route: &'static str, status: u16, duration: Duration) {
    counter!(REQUESTS_TOTAL, "route" => route, "status" => status.to_string()).increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "route" => route).record(duration.as_secs_f64());
}

/// Records a rejected input (`missing` or `not_integer`).
pub fn record_validation_failure(reason: &'static str) {
    counter!(VALIDATION_FAILURES_TOTAL, "reason" => reason).increment(1);
}

/// Records a fact lookup (`fetched` or `fallback`).
pub fn record_fact_lookup(outcome: &'static str) {
    counter!(FACT_LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
}

/// Increments the in-flight gauge for as long as it lives.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}
