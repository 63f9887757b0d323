//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Ticket and boarding storage, departure schedule (PostgreSQL)
//! - `events` - Event bus implementations (in-memory, Redis)
//! - `memory` - In-process storage and schedule for tests and local runs

pub mod events;
pub mod memory;
pub mod postgres;

pub use events::{InMemoryEventBus, RedisEventPublisher};
pub use memory::{FixedDepartureSchedule, InMemoryTicketStore};
