//! In-memory event bus implementation for testing.
//!
//! Captures every published envelope so tests can assert on what the core
//! announced. Can be switched into a failing mode to exercise best-effort
//! publishing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus for testing.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// service.sell_ticket(command).await?;
///
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("ticket.sold"));
/// ```
#[derive(Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
    failing: AtomicBool,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus whose every publish fails, as if the broker were down.
    pub fn failing() -> Self {
        let bus = Self::new();
        bus.set_failing(true);
        bus
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn published(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        // A panicking test thread must not hide the events from the others.
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // === Test Helpers ===

    /// Returns all published events, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published().clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    /// Clears all published events (for test isolation).
    pub fn clear(&self) {
        self.published().clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published().len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published().iter().any(|e| e.event_type == event_type)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::CacheError,
                format!("event bus unavailable, dropped {}", event.event_type),
            ));
        }
        self.published().push(event);
        Ok(())
    }
}
