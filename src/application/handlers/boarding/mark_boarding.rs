//! MarkBoardingHandler - Command handler for recording a boarded passenger.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::bounded;
use crate::domain::boarding::{BoardingMark, BoardingScan, ScanMethod};
use crate::domain::foundation::{TicketId, Timestamp, UserId};
use crate::domain::ticket::TicketError;
use crate::ports::BoardingRepository;

/// Command to mark a ticket as boarded.
#[derive(Debug, Clone)]
pub struct MarkBoardingCommand {
    pub ticket_id: TicketId,
    pub marked_by: UserId,
    pub scan_method: ScanMethod,
}

pub type MarkBoardingResult = BoardingMark;

/// Handler for boarding marks.
///
/// Existence, status, gate and duplicate checks all run inside
/// `BoardingRepository::mark`. A ticket is marked at most once.
pub struct MarkBoardingHandler {
    boarding: Arc<dyn BoardingRepository>,
    timeout: Duration,
}

impl MarkBoardingHandler {
    pub fn new(boarding: Arc<dyn BoardingRepository>, timeout: Duration) -> Self {
        Self { boarding, timeout }
    }

    pub async fn handle(
        &self,
        cmd: MarkBoardingCommand,
    ) -> Result<MarkBoardingResult, TicketError> {
        let scan = BoardingScan {
            ticket_id: cmd.ticket_id,
            marked_by: cmd.marked_by,
            scan_method: cmd.scan_method,
            marked_at: Timestamp::now(),
        };

        let mark = bounded(self.timeout, "mark boarding", self.boarding.mark(scan)).await?;

        tracing::info!(
            ticket_id = %mark.ticket_id,
            trip_id = %mark.trip_id,
            scan_method = %mark.scan_method,
            "Passenger boarded"
        );

        Ok(mark)
    }
}
