//! Ticket Core - ticket lifecycle and boarding coordination.
//!
//! Sells seats without double booking, prices refunds by time left until
//! departure, and runs a per-trip boarding gate that locks out refunds once
//! opened. Transports embed [`application::TicketService`].

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
