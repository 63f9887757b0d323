//! Outbound event plumbing.
//!
//! Every event the core emits is a plain serde struct that implements
//! [`DomainEvent`] through [`domain_event!`]. Before it leaves the process it
//! is wrapped in an [`EventEnvelope`], whose `event_type` is the bus subject
//! (`ticket.sold`, `ticket.returned`, `boarding.started`, `audit.log`).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::Timestamp;

/// Payload layout version stamped on every envelope.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// An event emitted by the core.
pub trait DomainEvent: Send + Sync {
    /// Bus subject. Collaborators subscribe by this name, so it never changes.
    fn event_type(&self) -> &'static str;

    fn aggregate_id(&self) -> String;

    /// `Ticket`, `Trip` or `AuditRecord`.
    fn aggregate_type(&self) -> &'static str;

    fn occurred_at(&self) -> Timestamp;

    fn event_id(&self) -> EventId;
}

/// `to_envelope()` for every serializable event.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    /// # Errors
    ///
    /// Returns the serializer error if the payload cannot be encoded as JSON.
    fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        EventEnvelope::from_event(self)
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Implements [`DomainEvent`] for a struct with an `event_id: EventId` field.
///
/// ```ignore
/// domain_event!(TicketSold {
///     event_type: "ticket.sold",
///     aggregate: Ticket(ticket_id),
///     occurred_at: sold_at,
/// });
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event:ident {
            event_type: $event_type:literal,
            aggregate: $aggregate:ident($aggregate_field:ident),
            occurred_at: $occurred_field:ident $(,)?
        }
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn aggregate_id(&self) -> String {
                self.$aggregate_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                stringify!($aggregate)
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.event_id
            }
        }
    };
}

pub use domain_event;

/// Identifier of one emitted event; consumers deduplicate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who caused the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Staff member or `system`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Wire form of an event, published as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    /// Also the pub/sub subject.
    pub event_type: String,
    pub schema_version: u32,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,
    pub payload: JsonValue,
    #[serde(default)]
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    /// Builds an envelope around an arbitrary payload, stamped now.
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            schema_version: EVENT_SCHEMA_VERSION,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            payload,
            metadata: EventMetadata::default(),
        }
    }

    /// Serializes `event` as the payload and copies its identity fields.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the event cannot be encoded as JSON.
    pub fn from_event<T>(event: &T) -> Result<Self, serde_json::Error>
    where
        T: DomainEvent + Serialize + ?Sized,
    {
        Ok(Self {
            event_id: event.event_id(),
            event_type: event.event_type().to_string(),
            schema_version: EVENT_SCHEMA_VERSION,
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
            metadata: EventMetadata::default(),
        })
    }

    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.user_id = Some(id.into());
        self
    }
}
