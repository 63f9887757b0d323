//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod boarding;
pub mod ticket;

pub use boarding::*;
pub use ticket::*;
