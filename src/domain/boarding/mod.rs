//! Boarding domain module.
//!
//! - `gate` - BoardingEvent latch, BoardingMark, BoardingStatus view
//! - `events` - `boarding.started`

mod events;
mod gate;

pub use events::BoardingStarted;
pub use gate::{BoardingEvent, BoardingMark, BoardingScan, BoardingStatus, ScanMethod};
