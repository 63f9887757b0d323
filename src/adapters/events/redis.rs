//! Redis pub/sub event publisher for production deployments.
//!
//! Each envelope is sent as `PUBLISH <event_type> <envelope-json>`. Redis
//! pub/sub keeps nothing for absent subscribers, which matches the core's
//! at-most-once delivery contract.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::config::RedisConfig;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// Publishes envelopes on Redis channels named after their event type.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
    timeout: Duration,
}

impl RedisEventPublisher {
    /// Wraps an established connection.
    pub fn new(conn: MultiplexedConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Opens a multiplexed connection. Publishes are then bounded by the
    /// configured publish timeout.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the URL is invalid or the server is unreachable
    /// within the timeout.
    pub async fn connect(config: &RedisConfig) -> Result<Self, DomainError> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            DomainError::new(ErrorCode::CacheError, format!("Invalid Redis URL: {}", e))
        })?;

        let conn = tokio::time::timeout(
            config.connect_timeout(),
            client.get_multiplexed_tokio_connection(),
        )
        .await
        .map_err(|_| DomainError::new(ErrorCode::Timeout, "Timed out connecting to Redis"))?
        .map_err(|e: redis::RedisError| {
            DomainError::new(
                ErrorCode::CacheError,
                format!("Failed to connect to Redis: {}", e),
            )
        })?;

        Ok(Self::new(conn, config.publish_timeout()))
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let body = serde_json::to_string(&event).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize {}: {}", event.event_type, e),
            )
        })?;

        let mut conn = self.conn.clone();
        let receivers: i64 =
            tokio::time::timeout(self.timeout, conn.publish(&event.event_type, body))
                .await
                .map_err(|_| {
                    DomainError::new(
                        ErrorCode::Timeout,
                        format!("Timed out publishing {}", event.event_type),
                    )
                })?
                .map_err(|e: redis::RedisError| {
                    DomainError::new(
                        ErrorCode::CacheError,
                        format!("Failed to publish {}: {}", event.event_type, e),
                    )
                })?;

        tracing::debug!(
            event_type = %event.event_type,
            event_id = %event.event_id,
            receivers,
            "Event published"
        );
        Ok(())
    }
}
