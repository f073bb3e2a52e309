//! Configuration module for the counterparty registry.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation. Every section defaults when absent, so an empty file (or
//! no file at all) yields a runnable configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use counterparty_registry::config::{load_config, Config};
//!
//! // Load from $REGISTRY_CONFIG, falling back to config.yaml
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::counterparty::value_objects::ExpectedLossBasis;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "REGISTRY_CONFIG";

/// Config file used when `REGISTRY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Risk computation configuration.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port for the operator API.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
        }
    }
}

impl ServerConfig {
    /// Socket address the HTTP server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.http_port)
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "server.bind_address '{}' is not a valid IP address: {e}",
                    self.bind_address
                ))
            })
    }
}

const fn default_http_port() -> u16 {
    8080
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Ledger gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Endpoint label reported by the connectivity check.
    #[serde(default = "default_gateway_endpoint")]
    pub endpoint: String,
    /// Artificial delay before each confirmation, in milliseconds.
    #[serde(default)]
    pub confirmation_latency_ms: u64,
    /// Refuse to start when the connectivity check fails.
    #[serde(default = "default_true")]
    pub require_connectivity: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_gateway_endpoint(),
            confirmation_latency_ms: 0,
            require_connectivity: true,
        }
    }
}

impl GatewayConfig {
    /// Confirmation latency as a `Duration`.
    #[must_use]
    pub const fn confirmation_latency(&self) -> Duration {
        Duration::from_millis(self.confirmation_latency_ms)
    }
}

fn default_gateway_endpoint() -> String {
    "in-memory".to_string()
}
const fn default_true() -> bool {
    true
}

/// Risk computation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Compute expected loss on exposure net of collateral.
    #[serde(default)]
    pub expected_loss_net_of_collateral: bool,
}

impl RiskConfig {
    /// The expected-loss basis selected by this configuration.
    #[must_use]
    pub const fn expected_loss_basis(&self) -> ExpectedLossBasis {
        if self.expected_loss_net_of_collateral {
            ExpectedLossBasis::NetOfCollateral
        } else {
            ExpectedLossBasis::Gross
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Start the Prometheus listener.
    #[serde(default)]
    pub enabled: bool,
    /// Listener address.
    #[serde(default = "default_metrics_listen_addr")]
    pub listen_addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: default_metrics_listen_addr(),
        }
    }
}

fn default_metrics_listen_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level directive (overridden by `RUST_LOG`).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: `json` or `pretty`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

// ============================================
// Configuration Loading
// ============================================

/// Resolve the config file path: explicit argument, then `REGISTRY_CONFIG`,
/// then `config.yaml`.
#[must_use]
pub fn resolve_config_path(path: Option<&str>) -> String {
    path.map(str::to_string)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = resolve_config_path(path);

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Like [`load_config`], but a missing `config.yaml` yields the defaults.
///
/// An explicit path or a path from `REGISTRY_CONFIG` must exist.
///
/// # Errors
///
/// Returns a `ConfigError` if an existing file cannot be read, parsed, or validated.
pub fn load_config_or_default(path: Option<&str>) -> Result<Config, ConfigError> {
    let resolved = resolve_config_path(path);
    if resolved == DEFAULT_CONFIG_PATH && !std::path::Path::new(&resolved).exists() {
        return Ok(Config::default());
    }
    load_config(Some(&resolved))
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }
    let http = config.server.socket_addr()?;

    if config.gateway.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "gateway.endpoint must not be empty".to_string(),
        ));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled {
        let addr: SocketAddr = metrics.listen_addr.parse().map_err(|e| {
            ConfigError::ValidationError(format!(
                "observability.metrics.listen_addr '{}' is invalid: {e}",
                metrics.listen_addr
            ))
        })?;
        if addr.port() == http.port() {
            return Err(ConfigError::ValidationError(
                "observability.metrics.listen_addr must not share the HTTP port".to_string(),
            ));
        }
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    if tracing_subscriber::EnvFilter::try_new(&config.observability.logging.level).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level '{}' is not a valid filter directive",
            config.observability.logging.level
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.gateway.endpoint, "in-memory");
        assert!(config.gateway.require_connectivity);
        assert_eq!(config.gateway.confirmation_latency(), Duration::ZERO);
        assert_eq!(config.risk.expected_loss_basis(), ExpectedLossBasis::Gross);
        assert!(!config.observability.metrics.enabled);
        assert_eq!(config.observability.logging.format, "json");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = load_config_from_string("").unwrap();
        assert_eq!(config.server.http_port, 8080);
    }

    #[test]
    fn load_minimal_config() {
        let yaml = r"
server:
  http_port: 9000
";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert!(!config.risk.expected_loss_net_of_collateral);
    }

    #[test]
    fn env_var_with_default_when_missing() {
        let input = "port: ${REGISTRY_CONFIG_TEST_NONEXISTENT_VAR:-8081}";
        assert_eq!(interpolate_env_vars(input), "port: 8081");
    }

    #[test]
    #[allow(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn env_var_without_default_becomes_empty() {
        let input = "endpoint: ${REGISTRY_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "endpoint: ");
    }

    #[test]
    fn validation_rejects_zero_port() {
        let yaml = r"
server:
  http_port: 0
";
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("http_port"));
    }

    #[test]
    fn validation_rejects_bad_bind_address() {
        let yaml = r#"
server:
  bind_address: "not-an-ip"
"#;
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("bind_address"));
    }

    #[test]
    fn validation_rejects_unknown_log_format() {
        let yaml = r#"
observability:
  logging:
    format: "xml"
"#;
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn validation_rejects_metrics_on_http_port() {
        let yaml = r#"
server:
  http_port: 9090
observability:
  metrics:
    enabled: true
    listen_addr: "0.0.0.0:9090"
"#;
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("listen_addr"));
    }

    #[test]
    fn full_config_parse() {
        let yaml = r#"
server:
  http_port: 8088
  bind_address: "127.0.0.1"

gateway:
  endpoint: "ledger.local"
  confirmation_latency_ms: 25
  require_connectivity: false

risk:
  expected_loss_net_of_collateral: true

observability:
  metrics:
    enabled: true
    listen_addr: "127.0.0.1:9191"
  logging:
    level: "debug"
    format: "pretty"
"#;
        let config = load_config_from_string(yaml).unwrap();

        assert_eq!(
            config.server.socket_addr().unwrap(),
            "127.0.0.1:8088".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.gateway.endpoint, "ledger.local");
        assert_eq!(
            config.gateway.confirmation_latency(),
            Duration::from_millis(25)
        );
        assert!(!config.gateway.require_connectivity);
        assert_eq!(
            config.risk.expected_loss_basis(),
            ExpectedLossBasis::NetOfCollateral
        );
        assert!(config.observability.metrics.enabled);
        assert_eq!(config.observability.logging.level, "debug");
    }

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  http_port: 8181").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.server.http_port, 8181);
    }

    #[test]
    fn load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = load_config(path.to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn example_config_is_valid() {
        let config = load_config_from_string(include_str!("../config.example.yaml")).unwrap();
        assert_eq!(config.gateway.endpoint, "in-memory");
        assert_eq!(config.risk.expected_loss_basis(), ExpectedLossBasis::Gross);
    }

    #[test]
    fn explicit_missing_path_is_not_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = load_config_or_default(path.to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn load_config_or_default_reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gateway:\n  confirmation_latency_ms: 25").unwrap();

        let config = load_config_or_default(file.path().to_str()).unwrap();
        assert_eq!(config.gateway.confirmation_latency(), Duration::from_millis(25));
    }

    #[test]
    fn resolve_config_path_prefers_argument() {
        assert_eq!(resolve_config_path(Some("custom.yaml")), "custom.yaml");
    }
}
