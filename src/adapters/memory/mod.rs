//! In-process adapters for tests and single-node local runs.

mod departure_schedule;
mod ticket_store;

pub use departure_schedule::FixedDepartureSchedule;
pub use ticket_store::InMemoryTicketStore;
