//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, NumerisConfig};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "NUMERIS";

/// Builds a [`NumerisConfig`] from layered sources.
///
/// Later layers override earlier ones:
/// 1. Built-in defaults, or a preset
/// 2. A TOML or JSON file (replaces the previous layer; omitted fields
///    take their defaults)
/// 3. Environment variables `PREFIX__SECTION__KEY`
///
/// ```no_run
/// use numeris_config::ConfigLoader;
///
/// # fn main() -> Result<(), numeris_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("numeris.toml")?
///     .with_dotenv()?
///     .with_env_prefix("NUMERIS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: NumerisConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: NumerisConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to the built-in defaults.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = NumerisConfig::default();
        self
    }

    /// Starts from [`NumerisConfig::development`].
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = NumerisConfig::development();
        self
    }

    /// Starts from [`NumerisConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = NumerisConfig::production();
        self
    }

    /// Loads a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, unreadable, has an unknown extension,
    /// or does not parse (unknown fields included).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = parse(&content, format)?;
        Ok(self)
    }

    /// Loads a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`with_file`](Self::with_file) when the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Parses configuration text in the given format (`"toml"` or `"json"`).
    ///
    /// ```
    /// use numeris_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[facts]\nenabled = false", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(!config.facts.enabled);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails on an unknown format or a parse error.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Enables environment overrides under `prefix`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads `.env` from the working directory into the process environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Fails if `.env` exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::DotenvError(e.to_string())),
        }
    }

    /// Applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable or unknown override, or a validation error.
    pub fn load(self) -> Result<NumerisConfig, ConfigError> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides without validating.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable or unknown override.
    pub fn load_unvalidated(mut self) -> Result<NumerisConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_vars(&prefix, env::vars())?;
        }
        Ok(self.config)
    }

    fn apply_env_vars(
        &mut self,
        prefix: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(path) = key.strip_prefix(&marker) {
                let parts: Vec<&str> = path.split("__").collect();
                self.apply_env_var(&key, &parts, &value)?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, parts: &[&str], value: &str) -> Result<(), ConfigError> {
        let config = &mut self.config;

        match parts {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                config.server.request_timeout_ms = parse_int(key, value)?;
            }
            ["SERVER", "SERVICE_NAME"] => config.server.service_name = value.to_string(),

            ["FACTS", "ENABLED"] => config.facts.enabled = parse_bool(key, value)?,
            ["FACTS", "BASE_URL"] => config.facts.base_url = value.to_string(),
            ["FACTS", "TIMEOUT_MS"] => config.facts.timeout_ms = parse_int(key, value)?,
            ["FACTS", "POOL_MAX_IDLE_PER_HOST"] => {
                config.facts.pool_max_idle_per_host = parse_int(key, value)?;
            }

            ["CORS", "ALLOW_ANY_ORIGIN"] => config.cors.allow_any_origin = parse_bool(key, value)?,
            ["CORS", "ALLOWED_ORIGINS"] => config.cors.allowed_origins = parse_list(value),
            ["CORS", "ALLOWED_METHODS"] => config.cors.allowed_methods = parse_list(value),
            ["CORS", "ALLOWED_HEADERS"] => config.cors.allowed_headers = parse_list(value),
            ["CORS", "MAX_AGE_SECS"] => config.cors.max_age_secs = parse_int(key, value)?,

            ["TELEMETRY", "ENVIRONMENT"] => config.telemetry.environment = value.to_string(),
            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                config.telemetry.logging.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => config.telemetry.logging.level = value.to_string(),
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                config.telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["TELEMETRY", "LOGGING", "INCLUDE_LOCATION"] => {
                config.telemetry.logging.include_location = parse_bool(key, value)?;
            }
            ["TELEMETRY", "METRICS", "ENABLED"] => {
                config.telemetry.metrics.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "METRICS", "ADDR"] => config.telemetry.metrics.addr = value.to_string(),
            ["TELEMETRY", "TRACING", "ENABLED"] => {
                config.telemetry.tracing.enabled = parse_bool(key, value)?;
            }
            ["TELEMETRY", "TRACING", "OTLP_ENDPOINT"] => {
                config.telemetry.tracing.otlp_endpoint = value.to_string();
            }
            ["TELEMETRY", "TRACING", "SAMPLING_RATIO"] => {
                config.telemetry.tracing.sampling_ratio = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected float"))?;
            }

            _ => return Err(ConfigError::env_parse_error(key, "unknown configuration key")),
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<NumerisConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected non-negative integer"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env_parse_error(key, "expected boolean")),
    }
}

// Comma-separated, blanks dropped.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
