//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).
//! `TicketService` bundles the handlers behind one facade for transports.

pub mod handlers;
mod service;
mod support;

pub use handlers::*;
pub use service::{ServiceDeps, ServiceSettings, TicketService, DEFAULT_OPERATION_TIMEOUT};
