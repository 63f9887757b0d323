//! Boarding handlers.
//!
//! ## Commands
//! - Opening a trip's boarding gate
//! - Marking a ticket as boarded, directly or from a scanned code
//!
//! ## Queries
//! - Boarding status for a trip

mod get_boarding_status;
mod mark_boarding;
mod scan_ticket;
mod start_boarding;

// Commands
pub use mark_boarding::{MarkBoardingCommand, MarkBoardingHandler, MarkBoardingResult};
pub use scan_ticket::{ScanTicketCommand, ScanTicketHandler, ScanTicketResult};
pub use start_boarding::{StartBoardingCommand, StartBoardingHandler, StartBoardingResult};

// Queries
pub use get_boarding_status::{
    GetBoardingStatusHandler, GetBoardingStatusQuery, GetBoardingStatusResult,
};
