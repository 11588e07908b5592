//! The root configuration type.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, CorsSection, FactsSection, LogFormat, ServerSection, TelemetrySection,
};

/// Complete Numeris configuration.
///
/// Load it with [`ConfigLoader`](crate::ConfigLoader).
///
/// ```
/// use numeris_config::NumerisConfig;
///
/// let config = NumerisConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct NumerisConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Fact lookup settings.
    #[serde(default)]
    pub facts: FactsSection,

    /// Cross-origin policy.
    #[serde(default)]
    pub cors: CorsSection,

    /// Logging, metrics, and tracing.
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl NumerisConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> NumerisConfigBuilder {
        NumerisConfigBuilder::default()
    }

    /// Checks cross-field and value constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_addr("server.http_addr", &self.server.http_addr)?;

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.server.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "server.service_name",
                "must not be empty",
            ));
        }

        if self.facts.enabled {
            let url = &self.facts.base_url;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid_value(
                    "facts.base_url",
                    format!("must be an http:// or https:// URL, got '{url}'"),
                ));
            }
            if self.facts.timeout_ms == 0 {
                return Err(ConfigError::invalid_value(
                    "facts.timeout_ms",
                    "must be greater than zero",
                ));
            }
        }

        if !self.cors.allow_any_origin && self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::invalid_value(
                "cors.allowed_origins",
                "must list at least one origin when allow_any_origin is false",
            ));
        }

        for method in &self.cors.allowed_methods {
            if method != "*" && !is_token(method) {
                return Err(ConfigError::invalid_value(
                    "cors.allowed_methods",
                    format!("'{method}' is not a valid HTTP method"),
                ));
            }
        }

        if self.telemetry.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                "must not be empty",
            ));
        }

        if self.telemetry.metrics.enabled {
            parse_addr("telemetry.metrics.addr", &self.telemetry.metrics.addr)?;
        }

        if !(0.0..=1.0).contains(&self.telemetry.tracing.sampling_ratio) {
            return Err(ConfigError::invalid_value(
                "telemetry.tracing.sampling_ratio",
                "must be between 0.0 and 1.0",
            ));
        }

        if self.telemetry.tracing.enabled && self.telemetry.tracing.otlp_endpoint.is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.tracing.otlp_endpoint",
                "must be set when tracing is enabled",
            ));
        }

        Ok(())
    }

    /// Local development: pretty `debug` logs with source locations.
    ///
    /// ```
    /// use numeris_config::{LogFormat, NumerisConfig};
    ///
    /// let config = NumerisConfig::development();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.telemetry.environment = "development".to_string();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;
        config
    }

    /// Production: JSON `info` logs and the metrics endpoint.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.telemetry.environment = "production".to_string();
        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.metrics.enabled = true;
        config
    }

    /// Graceful shutdown drain window.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Whole-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// Fact lookup timeout.
    #[must_use]
    pub fn facts_timeout(&self) -> Duration {
        Duration::from_millis(self.facts.timeout_ms)
    }
}

fn parse_addr(field: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid_value(field, format!("invalid socket address: {value}")))
}

// RFC 9110 token characters, which is what a method name may contain.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Builder for [`NumerisConfig`].
#[derive(Debug, Default)]
pub struct NumerisConfigBuilder {
    server: Option<ServerSection>,
    facts: Option<FactsSection>,
    cors: Option<CorsSection>,
    telemetry: Option<TelemetrySection>,
}

impl NumerisConfigBuilder {
    /// Sets the server section.
    #[must_use]
    pub fn server(mut self, server: ServerSection) -> Self {
        self.server = Some(server);
        self
    }

    /// Sets the facts section.
    #[must_use]
    pub fn facts(mut self, facts: FactsSection) -> Self {
        self.facts = Some(facts);
        self
    }

    /// Sets the CORS section.
    #[must_use]
    pub fn cors(mut self, cors: CorsSection) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Sets the telemetry section.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetrySection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Builds the configuration; unset sections take their defaults.
    #[must_use]
    pub fn build(self) -> NumerisConfig {
        NumerisConfig {
            server: self.server.unwrap_or_default(),
            facts: self.facts.unwrap_or_default(),
            cors: self.cors.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: &NumerisConfig) -> String {
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(NumerisConfig::default().validate().is_ok());
        assert!(NumerisConfig::development().validate().is_ok());
        assert!(NumerisConfig::production().validate().is_ok());
    }

    #[test]
    fn test_invalid_http_addr() {
        let mut config = NumerisConfig::default();
        config.server.http_addr = "localhost".to_string();
        assert_eq!(invalid_field(&config), "server.http_addr");
    }

    #[test]
    fn test_zero_request_timeout() {
        let mut config = NumerisConfig::default();
        config.server.request_timeout_ms = 0;
        assert_eq!(invalid_field(&config), "server.request_timeout_ms");
    }

    #[test]
    fn test_non_http_base_url() {
        let mut config = NumerisConfig::default();
        config.facts.base_url = "ftp://numbersapi.com".to_string();
        assert_eq!(invalid_field(&config), "facts.base_url");

        // Not checked when the lookup is disabled.
        config.facts.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_facts_timeout() {
        let mut config = NumerisConfig::default();
        config.facts.timeout_ms = 0;
        assert_eq!(invalid_field(&config), "facts.timeout_ms");
    }

    #[test]
    fn test_cors_requires_origins_when_restricted() {
        let mut config = NumerisConfig::default();
        config.cors.allow_any_origin = false;
        assert_eq!(invalid_field(&config), "cors.allowed_origins");

        config.cors.allowed_origins = vec!["https://example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cors_rejects_bad_method() {
        let mut config = NumerisConfig::default();
        config.cors.allowed_methods = vec!["GET".to_string(), "NOT A METHOD".to_string()];
        assert_eq!(invalid_field(&config), "cors.allowed_methods");
    }

    #[test]
    fn test_metrics_addr_checked_only_when_enabled() {
        let mut config = NumerisConfig::default();
        config.telemetry.metrics.addr = "nowhere".to_string();
        assert!(config.validate().is_ok());

        config.telemetry.metrics.enabled = true;
        assert_eq!(invalid_field(&config), "telemetry.metrics.addr");
    }

    #[test]
    fn test_sampling_ratio_bounds() {
        let mut config = NumerisConfig::default();
        config.telemetry.tracing.sampling_ratio = 1.5;
        assert_eq!(invalid_field(&config), "telemetry.tracing.sampling_ratio");

        config.telemetry.tracing.sampling_ratio = -0.1;
        assert_eq!(invalid_field(&config), "telemetry.tracing.sampling_ratio");

        config.telemetry.tracing.sampling_ratio = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = NumerisConfig::development();
        assert_eq!(dev.telemetry.logging.level, "debug");
        assert!(dev.telemetry.logging.include_location);
        assert!(!dev.telemetry.metrics.enabled);

        let prod = NumerisConfig::production();
        assert_eq!(prod.telemetry.environment, "production");
        assert_eq!(prod.telemetry.logging.format, LogFormat::Json);
        assert!(prod.telemetry.metrics.enabled);
    }

    #[test]
    fn test_durations() {
        let config = NumerisConfig::default();
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.facts_timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_builder() {
        let config = NumerisConfig::builder()
            .facts(FactsSection {
                enabled: false,
                ..FactsSection::default()
            })
            .build();

        assert!(!config.facts.enabled);
        assert_eq!(config.server, ServerSection::default());
    }

    #[test]
    fn test_is_token() {
        assert!(is_token("GET"));
        assert!(is_token("PURGE"));
        assert!(!is_token(""));
        assert!(!is_token("GET POST"));
    }
}
