//! ScanTicketHandler - Boards a passenger from a scanned code.
//!
//! The controller app sends whatever the scanner read. QR codes are tried
//! first, then barcodes; the mark records which one matched.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::bounded;
use crate::domain::boarding::{BoardingMark, BoardingScan, ScanMethod};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::ticket::{Ticket, TicketError};
use crate::ports::{BoardingRepository, TicketRepository};

/// Command carrying a raw scanned code.
#[derive(Debug, Clone)]
pub struct ScanTicketCommand {
    pub code: String,
    pub marked_by: UserId,
}

#[derive(Debug, Clone)]
pub struct ScanTicketResult {
    pub ticket: Ticket,
    pub mark: BoardingMark,
}

pub struct ScanTicketHandler {
    tickets: Arc<dyn TicketRepository>,
    boarding: Arc<dyn BoardingRepository>,
    timeout: Duration,
}

impl ScanTicketHandler {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        boarding: Arc<dyn BoardingRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            tickets,
            boarding,
            timeout,
        }
    }

    pub async fn handle(&self, cmd: ScanTicketCommand) -> Result<ScanTicketResult, TicketError> {
        let code = cmd.code.trim();
        if code.is_empty() {
            return Err(TicketError::validation("code", "scanned code is empty"));
        }

        let (ticket, scan_method) = self.resolve(code).await?;

        let scan = BoardingScan {
            ticket_id: ticket.id,
            marked_by: cmd.marked_by,
            scan_method,
            marked_at: Timestamp::now(),
        };
        let mark = bounded(self.timeout, "mark boarding", self.boarding.mark(scan)).await?;

        tracing::info!(
            ticket_id = %mark.ticket_id,
            trip_id = %mark.trip_id,
            scan_method = %mark.scan_method,
            "Passenger boarded"
        );

        Ok(ScanTicketResult { ticket, mark })
    }

    async fn resolve(&self, code: &str) -> Result<(Ticket, ScanMethod), TicketError> {
        if let Some(ticket) =
            bounded(self.timeout, "load ticket", self.tickets.find_by_qr_code(code)).await?
        {
            return Ok((ticket, ScanMethod::Qr));
        }
        if let Some(ticket) =
            bounded(self.timeout, "load ticket", self.tickets.find_by_bar_code(code)).await?
        {
            return Ok((ticket, ScanMethod::Barcode));
        }
        Err(TicketError::code_not_found(code))
    }
}
