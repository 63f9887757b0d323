//! Helpers shared by the handlers: deadlines on port calls and best-effort
//! event publishing.

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode, SerializableDomainEvent, UserId};
use crate::ports::EventPublisher;

/// Runs a port call under a deadline. Elapsed time becomes a `Timeout`
/// error, which the ticket layer reports as retryable.
pub(crate) async fn bounded<T, F>(
    timeout: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::new(
            ErrorCode::Timeout,
            format!("{} timed out after {:?}", operation, timeout),
        )),
    }
}

/// Publishes an event without letting a failure reach the caller.
///
/// The state change has already committed; a lost event is logged and
/// otherwise ignored.
pub(crate) async fn publish_best_effort<E>(
    publisher: &dyn EventPublisher,
    timeout: Duration,
    event: &E,
    user_id: &UserId,
) where
    E: SerializableDomainEvent,
{
    let envelope = match event.to_envelope() {
        Ok(envelope) => envelope.with_user_id(user_id.as_str()),
        Err(e) => {
            tracing::warn!(
                event_type = event.event_type(),
                error = %e,
                "Failed to serialize event, dropping it"
            );
            return;
        }
    };

    let event_type = envelope.event_type.clone();
    let event_id = envelope.event_id;

    match bounded(timeout, "publish event", publisher.publish(envelope)).await {
        Ok(()) => {
            tracing::debug!(event_type = %event_type, event_id = %event_id, "Event published");
        }
        Err(e) => {
            tracing::warn!(
                event_type = %event_type,
                event_id = %event_id,
                error = %e,
                "Failed to publish event"
            );
        }
    }
}
