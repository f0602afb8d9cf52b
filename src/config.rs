//! Configuration loading and constants.
//!
//! Loads the server configuration from a TOML file. Every section is optional;
//! a missing key falls back to the defaults below. `AppConfig` is the root
//! configuration struct.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Health responses must never be served from an intermediate cache.
pub const CACHE_CONTROL_HEALTH: &str = "no-store";

// =============================================================================
// Defaults
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "healthz=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

pub const DEFAULT_LIVENESS_PATH: &str = "/healthz";
pub const DEFAULT_READINESS_PATH: &str = "/readyz";

/// Seconds to wait for in-flight requests after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// Seconds readiness reports 503 before the listener stops accepting connections
pub const DEFAULT_SHUTDOWN_DRAIN_DELAY_SECS: u64 = 5;

const LOG_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Probe routes
    #[serde(default)]
    pub health: HealthConfig,
    /// Graceful shutdown behaviour
    #[serde(default)]
    pub shutdown: ShutdownConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Routes the probes are mounted on
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Always-up liveness route
    #[serde(default = "HealthConfig::default_liveness_path")]
    pub liveness_path: String,
    /// Readiness route, answers 503 once shutdown begins
    #[serde(default = "HealthConfig::default_readiness_path")]
    pub readiness_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            liveness_path: Self::default_liveness_path(),
            readiness_path: Self::default_readiness_path(),
        }
    }
}

impl HealthConfig {
    fn default_liveness_path() -> String {
        DEFAULT_LIVENESS_PATH.to_string()
    }

    fn default_readiness_path() -> String {
        DEFAULT_READINESS_PATH.to_string()
    }

    /// Whether `path` is one of the probe routes
    pub fn is_probe_path(&self, path: &str) -> bool {
        path == self.liveness_path || path == self.readiness_path
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShutdownConfig {
    /// Upper bound on waiting for in-flight requests once the listener closes
    #[serde(default = "ShutdownConfig::default_grace_period")]
    pub grace_period_seconds: u64,
    /// Time readiness answers 503 on new connections before the listener closes
    #[serde(default = "ShutdownConfig::default_drain_delay")]
    pub drain_delay_seconds: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_seconds: Self::default_grace_period(),
            drain_delay_seconds: Self::default_drain_delay(),
        }
    }
}

impl ShutdownConfig {
    fn default_grace_period() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }

    fn default_drain_delay() -> u64 {
        DEFAULT_SHUTDOWN_DRAIN_DELAY_SECS
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_seconds)
    }

    pub fn drain_delay(&self) -> Duration {
        Duration::from_secs(self.drain_delay_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses and validates a configuration document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, path) in [
            ("health.liveness_path", &self.health.liveness_path),
            ("health.readiness_path", &self.health.readiness_path),
        ] {
            validate_probe_path(name, path)?;
        }

        if self.health.liveness_path == self.health.readiness_path {
            return Err(ConfigError::Validation(format!(
                "health.liveness_path and health.readiness_path are both {:?}",
                self.health.liveness_path
            )));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.format must be one of {:?}, got {:?}",
                LOG_FORMATS, self.logging.format
            )));
        }

        Ok(())
    }
}

/// Probe routes are literal paths. Parameter and wildcard syntax makes axum
/// panic when the router is built.
fn validate_probe_path(name: &str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must start with '/', got {:?}",
            name, path
        )));
    }

    if path.contains(['{', '}']) {
        return Err(ConfigError::Validation(format!(
            "{} must be a literal path without '{{' or '}}', got {:?}",
            name, path
        )));
    }

    if path
        .split('/')
        .any(|segment| segment.starts_with('*') || segment.starts_with(':'))
    {
        return Err(ConfigError::Validation(format!(
            "{} must not contain segments starting with '*' or ':', got {:?}",
            name, path
        )));
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
