//! Ticket domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Ticket aggregate and refund bookkeeping
//! - `status` - TicketStatus state machine
//! - `values` - Payment method and passenger details
//! - `codes` - QR / barcode generation
//! - `events` - `ticket.sold` and `ticket.returned`
//! - `errors` - TicketError returned by every operation

mod aggregate;
mod codes;
mod errors;
mod events;
mod status;
mod values;

pub use aggregate::{RefundDetails, Ticket};
pub use codes::TicketCodes;
pub use errors::{ConflictReason, ErrorKind, NotFoundTarget, TicketError};
pub use events::{TicketReturned, TicketSold};
pub use status::TicketStatus;
pub use values::{Passenger, PaymentMethod};
