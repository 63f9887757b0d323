//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `TicketRepository` - Tickets, seat ledger, atomic refunds, sales figures
//! - `BoardingRepository` - Per-trip gate latch and per-ticket marks
//!
//! ## Collaborator Ports
//!
//! - `DepartureSchedule` - Trip departure times owned by scheduling
//! - `EventPublisher` - Best-effort outbound events

mod boarding_repository;
mod departure_schedule;
mod event_publisher;
mod ticket_repository;

pub use boarding_repository::BoardingRepository;
pub use departure_schedule::DepartureSchedule;
pub use event_publisher::EventPublisher;
pub use ticket_repository::TicketRepository;
