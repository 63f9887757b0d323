//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, money, errors, events)
//! - `ticket` - Ticket aggregate, status machine and sale/return events
//! - `boarding` - Per-trip boarding gate, marks and status view
//! - `refund` - Pure refund penalty policy
//! - `audit` - Audit trail records
//! - `stats` - Daily sales figures

pub mod audit;
pub mod boarding;
pub mod foundation;
pub mod refund;
pub mod stats;
pub mod ticket;
