//! Ticket store connection settings.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MIN_CONNECTIONS: u32 = 2;
const MAX_CONNECTIONS: u32 = 20;
const POOL_CEILING: u32 = 100;
const ACQUIRE_TIMEOUT_SECS: u64 = 3;
const IDLE_TIMEOUT_SECS: u64 = 600;
const MAX_LIFETIME_SECS: u64 = 1800;

/// Postgres pool for tickets, gates and marks.
///
/// Every sale, refund and gate open holds one connection for its
/// transaction, so `max_connections` caps how many counters and scanners
/// can write at once.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` URL, required.
    pub url: String,

    #[serde(default = "min_connections")]
    pub min_connections: u32,

    #[serde(default = "max_connections")]
    pub max_connections: u32,

    /// Wait for a free connection before the call fails as retryable.
    #[serde(default = "acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    #[serde(default = "idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    #[serde(default = "max_lifetime_secs")]
    pub max_lifetime_secs: u64,

    /// Apply `migrations/` before serving.
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    /// The URL with any password masked, for logs.
    pub fn redacted_url(&self) -> String {
        let masked = self.url.split_once("://").and_then(|(scheme, rest)| {
            let (credentials, host) = rest.rsplit_once('@')?;
            let (user, _password) = credentials.split_once(':')?;
            Some(format!("{}://{}:***@{}", scheme, user, host))
        });
        masked.unwrap_or_else(|| self.url.clone())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("TICKET_CORE__DATABASE__URL"));
        }
        let postgres = ["postgres://", "postgresql://"];
        if !postgres.iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > POOL_CEILING {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("database acquire"));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: MIN_CONNECTIONS,
            max_connections: MAX_CONNECTIONS,
            acquire_timeout_secs: ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: IDLE_TIMEOUT_SECS,
            max_lifetime_secs: MAX_LIFETIME_SECS,
            run_migrations: false,
        }
    }
}

fn min_connections() -> u32 {
    MIN_CONNECTIONS
}

fn max_connections() -> u32 {
    MAX_CONNECTIONS
}

fn acquire_timeout_secs() -> u64 {
    ACQUIRE_TIMEOUT_SECS
}

fn idle_timeout_secs() -> u64 {
    IDLE_TIMEOUT_SECS
}

fn max_lifetime_secs() -> u64 {
    MAX_LIFETIME_SECS
}
