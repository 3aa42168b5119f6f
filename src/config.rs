use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidatorError};
use crate::utils::get_env_with_prefix;

/// Top-level configuration for tideway-validator
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings applied by every [`ValidationLayer`](crate::ValidationLayer)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Maximum request body size buffered for `body` and `json` fields (default: 10MB)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Level used to log requests rejected with 400
    #[serde(default = "default_failure_level")]
    pub failure_level: LogLevel,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Log level for validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            failure_level: default_failure_level(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB default
}

fn default_failure_level() -> LogLevel {
    LogLevel::Debug
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

impl ValidationConfig {
    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::new()
    }

    /// Load validation settings from environment variables
    ///
    /// Reads `TIDEWAY_VALIDATOR_MAX_BODY_SIZE` and
    /// `TIDEWAY_VALIDATOR_FAILURE_LEVEL` (or the unprefixed names).
    /// Unparseable values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(size) = get_env_with_prefix("VALIDATOR_MAX_BODY_SIZE") {
            if let Ok(size) = size.parse() {
                config.max_body_size = size;
            }
        }

        if let Some(level) = get_env_with_prefix("VALIDATOR_FAILURE_LEVEL") {
            if let Some(level) = parse_log_level(&level) {
                config.failure_level = level;
            }
        }

        config
    }
}

fn parse_log_level(s: &str) -> Option<LogLevel> {
    match s.to_lowercase().as_str() {
        "trace" => Some(LogLevel::Trace),
        "debug" => Some(LogLevel::Debug),
        "info" => Some(LogLevel::Info),
        "warn" | "warning" => Some(LogLevel::Warn),
        "error" => Some(LogLevel::Error),
        _ => None,
    }
}

/// Builder for [`ValidationConfig`]
#[must_use = "builder does nothing until you call build()"]
pub struct ValidationConfigBuilder {
    config: ValidationConfig,
}

impl ValidationConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.max_body_size = bytes;
        self
    }

    pub fn failure_level(mut self, level: LogLevel) -> Self {
        self.config.failure_level = level;
        self
    }

    pub fn build(self) -> ValidationConfig {
        self.config
    }
}

impl Default for ValidationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Config`] with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the largest body the validator will buffer
    ///
    /// # Example
    ///
    /// ```rust
    /// use tideway_validator::config::ConfigBuilder;
    ///
    /// let config = ConfigBuilder::new()
    ///     .with_max_body_size(1024 * 1024) // 1MB
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.validation.max_body_size, 1024 * 1024);
    /// ```
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.config.validation.max_body_size = max_body_size;
        self
    }

    pub fn with_failure_level(mut self, level: LogLevel) -> Self {
        self.config.validation.failure_level = level;
        self
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.config.validation = validation;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Load configuration from environment variables with TIDEWAY_ prefix
    pub fn from_env(mut self) -> Self {
        self.config.validation = ValidationConfig::from_env();

        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Config`] for an unknown log level or a zero
    /// body size limit.
    pub fn build(self) -> Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(ValidatorError::config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        if self.config.validation.max_body_size == 0 {
            return Err(ValidatorError::config(
                "Maximum body size must be greater than 0",
            ));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
