//! Ticket handlers.
//!
//! ## Commands
//! - Selling a ticket, with seat reservation
//! - Refunding a ticket under the penalty policy
//!
//! ## Queries
//! - Single-ticket lookup by id, QR code or barcode
//! - A trip's passenger list
//! - Daily sales figures (admin)

mod get_sales_stats;
mod get_ticket;
mod list_trip_tickets;
mod refund_ticket;
mod sell_ticket;

// Commands
pub use refund_ticket::{RefundTicketCommand, RefundTicketHandler, RefundTicketResult};
pub use sell_ticket::{SellTicketCommand, SellTicketHandler, SellTicketResult, MAX_CODE_ATTEMPTS};

// Queries
pub use get_sales_stats::{GetSalesStatsHandler, GetSalesStatsQuery, GetSalesStatsResult};
pub use get_ticket::{GetTicketHandler, GetTicketQuery, GetTicketResult};
pub use list_trip_tickets::{ListTripTicketsHandler, ListTripTicketsQuery, ListTripTicketsResult};
