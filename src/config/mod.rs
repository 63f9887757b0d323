//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TICKET_CORE` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use ticket_core::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let settings = config.service_settings();
//! ```

mod database;
mod error;
mod redis;
mod refund;
mod service;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use refund::RefundConfig;
pub use service::{Environment, LogFormat, ServiceConfig};

use serde::Deserialize;

use crate::application::ServiceSettings;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TICKET_CORE";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Environment, logging and call deadlines
    #[serde(default)]
    pub service: ServiceConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis configuration (event pub/sub)
    pub redis: RedisConfig,

    /// Refund penalty tiers
    #[serde(default)]
    pub refund: RefundConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TICKET_CORE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TICKET_CORE__DATABASE__URL=...` -> `database.url = ...`
    /// - `TICKET_CORE__REFUND__UNDER_12_HOURS=0.3` -> `refund.under_12_hours = 0.3`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.refund.validate()?;
        Ok(())
    }

    /// Settings for `TicketService`.
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            policy: self.refund.policy(),
            operation_timeout: self.service.operation_timeout(),
        }
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.service.is_production()
    }
}
