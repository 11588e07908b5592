//! Configuration sections.
//!
//! Every section rejects unknown fields and fills omitted fields with
//! their defaults, so a file only needs to name what it changes.

use serde::{Deserialize, Serialize};

/// `[server]`: HTTP listener and request handling.
///
/// ```
/// use numeris_config::ServerSection;
///
/// let server: ServerSection = toml::from_str(r#"http_addr = "127.0.0.1:3000""#).unwrap();
/// assert_eq!(server.http_addr, "127.0.0.1:3000");
/// assert_eq!(server.request_timeout_ms, 30_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// How long in-flight connections may drain after a shutdown signal.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Upper bound on handling one request, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Name reported by `/health` and attached to traces.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
            service_name: default_service_name(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_service_name() -> String {
    "numeris".to_string()
}

/// `[facts]`: the outbound trivia lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FactsSection {
    /// When `false`, every response carries the fallback fact.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Numbers API base URL.
    #[serde(default = "default_facts_base_url")]
    pub base_url: String,

    /// Lookup timeout in milliseconds.
    #[serde(default = "default_facts_timeout")]
    pub timeout_ms: u64,

    /// Idle pooled connections kept per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,
}

impl Default for FactsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_facts_base_url(),
            timeout_ms: default_facts_timeout(),
            pool_max_idle_per_host: default_pool_max_idle(),
        }
    }
}

fn default_facts_base_url() -> String {
    "http://numbersapi.com".to_string()
}

fn default_facts_timeout() -> u64 {
    3000
}

fn default_pool_max_idle() -> usize {
    16
}

/// `[cors]`: cross-origin policy.
///
/// The default allows every origin, method, and header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CorsSection {
    /// Allow any origin. When `false`, `allowed_origins` must be non-empty.
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,

    /// Exact origins allowed when `allow_any_origin` is `false`.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allowed methods; `"*"` allows any.
    #[serde(default = "default_wildcard")]
    pub allowed_methods: Vec<String>,

    /// Allowed request headers; `"*"` allows any.
    #[serde(default = "default_wildcard")]
    pub allowed_headers: Vec<String>,

    /// Preflight cache lifetime in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
            allowed_origins: Vec::new(),
            allowed_methods: default_wildcard(),
            allowed_headers: default_wildcard(),
            max_age_secs: default_max_age(),
        }
    }
}

fn default_wildcard() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_age() -> u64 {
    86_400
}

/// Log line format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable output.
    Pretty,
}

/// `[telemetry.logging]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Install a log subscriber.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `"info"` or `"info,numeris_facts=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[telemetry.metrics]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Serve a Prometheus scrape endpoint.
    #[serde(default)]
    pub enabled: bool,

    /// Scrape endpoint address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// `[telemetry.tracing]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TracingSection {
    /// Export spans over OTLP.
    #[serde(default)]
    pub enabled: bool,

    /// OTLP gRPC endpoint.
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,

    /// Fraction of root traces sampled, `0.0..=1.0`.
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

impl Default for TracingSection {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

/// `[telemetry]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Deployment environment label.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Tracing settings.
    #[serde(default)]
    pub tracing: TracingSection,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            logging: LoggingSection::default(),
            metrics: MetricsSection::default(),
            tracing: TracingSection::default(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_true() -> bool {
    true
}
