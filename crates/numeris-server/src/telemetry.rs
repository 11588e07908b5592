//! Maps loaded configuration onto the telemetry subsystems.

use numeris_config::{LogFormat as ConfigLogFormat, NumerisConfig};
use numeris_telemetry::{LogConfig, LogFormat, MetricsConfig, TelemetryConfig, TracingConfig};

/// Builds the telemetry configuration for this service.
///
/// ```rust
/// use numeris_config::NumerisConfig;
/// use numeris_server::telemetry_config;
///
/// let telemetry = telemetry_config(&NumerisConfig::production());
/// assert!(telemetry.metrics.enabled);
/// assert_eq!(telemetry.tracing.environment, "production");
/// ```
pub fn telemetry_config(config: &NumerisConfig) -> TelemetryConfig {
    let section = &config.telemetry;

    let logging = LogConfig {
        enabled: section.logging.enabled,
        level: section.logging.level.clone(),
        format: match section.logging.format {
            ConfigLogFormat::Json => LogFormat::Json,
            ConfigLogFormat::Pretty => LogFormat::Pretty,
        },
        span_events: false,
        file_line_info: section.logging.include_location,
    };

    let metrics = MetricsConfig {
        enabled: section.metrics.enabled,
        addr: section.metrics.addr.clone(),
        ..MetricsConfig::default()
    };

    let tracing = TracingConfig {
        enabled: section.tracing.enabled,
        otlp_endpoint: section.tracing.otlp_endpoint.clone(),
        sampling_ratio: section.tracing.sampling_ratio,
        ..TracingConfig::default()
    };

    TelemetryConfig::builder()
        .service_name(config.server.service_name.clone())
        .service_version(env!("CARGO_PKG_VERSION"))
        .environment(section.environment.clone())
        .logging(logging)
        .metrics(metrics)
        .tracing(tracing)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_map_through() {
        let telemetry = telemetry_config(&NumerisConfig::default());
        assert!(telemetry.logging.enabled);
        assert_eq!(telemetry.logging.level, "info");
        assert_eq!(telemetry.logging.format, LogFormat::Json);
        assert!(!telemetry.metrics.enabled);
        assert_eq!(telemetry.metrics.addr, "0.0.0.0:9090");
        assert!(!telemetry.tracing.enabled);
        assert_eq!(telemetry.tracing.service_name, "numeris");
    }

    #[test]
    fn test_development_preset() {
        let telemetry = telemetry_config(&NumerisConfig::development());
        assert_eq!(telemetry.logging.level, "debug");
        assert_eq!(telemetry.logging.format, LogFormat::Pretty);
        assert!(telemetry.logging.file_line_info);
    }

    #[test]
    fn test_tracing_section() {
        let mut config = NumerisConfig::default();
        config.server.service_name = "numeris-edge".to_string();
        config.telemetry.tracing.enabled = true;
        config.telemetry.tracing.otlp_endpoint = "http://collector:4317".to_string();
        config.telemetry.tracing.sampling_ratio = 0.25;

        let telemetry = telemetry_config(&config);
        assert!(telemetry.tracing.enabled);
        assert_eq!(telemetry.tracing.otlp_endpoint, "http://collector:4317");
        assert!((telemetry.tracing.sampling_ratio - 0.25).abs() < f64::EPSILON);
        assert_eq!(telemetry.tracing.service_name, "numeris-edge");
    }
}
