//! Main configuration types.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, ParserSection, ServerConfig};

/// Complete Argus configuration.
///
/// # Example
///
/// ```
/// use argus_config::ArgusConfig;
///
/// let config = ArgusConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert_eq!(config.parser.error_status, 422);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ArgusConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Argument parser configuration.
    #[serde(default)]
    pub parser: ParserSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArgusConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The server address is not a socket address
    /// - The parser error status is not a 4xx code
    /// - The body size limit is zero
    /// - No default location is configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if !(400..=499).contains(&self.parser.error_status) {
            return Err(ConfigError::invalid_value(
                "parser.error_status",
                format!("must be a 4xx status, got {}", self.parser.error_status),
            ));
        }

        if self.parser.max_body_size == 0 {
            return Err(ConfigError::invalid_value(
                "parser.max_body_size",
                "must be greater than zero",
            ));
        }

        if self.parser.default_locations.is_empty() {
            return Err(ConfigError::invalid_value(
                "parser.default_locations",
                "at least one location is required",
            ));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Production preset: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ArgusConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_addr() {
        let mut config = ArgusConfig::default();
        config.server.http_addr = "localhost".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_error_status_must_be_4xx() {
        let mut config = ArgusConfig::default();
        config.parser.error_status = 500;
        assert!(config.validate().is_err());
        config.parser.error_status = 400;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_body_size() {
        let mut config = ArgusConfig::default();
        config.parser.max_body_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_locations() {
        let mut config = ArgusConfig::default();
        config.parser.default_locations.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(ArgusConfig::development().logging.format, LogFormat::Pretty);
        assert_eq!(ArgusConfig::production().logging.format, LogFormat::Json);
    }
}
