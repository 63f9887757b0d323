//! Service-wide settings: environment, logging, call deadlines

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `operation_timeout_secs`.
const MAX_OPERATION_TIMEOUT_SECS: u64 = 60;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Environment name
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// `EnvFilter` directive, e.g. `info,ticket_core=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Deadline for each store, schedule or publish call, in seconds
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,
}

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Log line format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for local runs
    #[default]
    Pretty,
    /// One JSON object per line, for log shipping
    Json,
}

impl ServiceConfig {
    /// Get the per-call deadline as Duration
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Validate service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.operation_timeout_secs == 0 || self.operation_timeout_secs > MAX_OPERATION_TIMEOUT_SECS
        {
            return Err(ValidationError::InvalidTimeout("operation"));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            operation_timeout_secs: default_operation_timeout(),
        }
    }
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_log_level() -> String {
    "info,ticket_core=debug,sqlx=warn".to_string()
}

fn default_operation_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.operation_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let mut config = ServiceConfig::default();
        assert!(!config.is_production());

        config.environment = Environment::Production;
        assert!(config.is_production());
    }

    #[test]
    fn test_validation_operation_timeout_bounds() {
        for secs in [0, 61] {
            let config = ServiceConfig {
                operation_timeout_secs: secs,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::InvalidTimeout("operation"))
            );
        }

        let config = ServiceConfig {
            operation_timeout_secs: 60,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
