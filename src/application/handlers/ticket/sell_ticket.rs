//! SellTicketHandler - Command handler for selling tickets.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::{bounded, publish_best_effort};
use crate::domain::foundation::{ErrorCode, Money, SeatId, Timestamp, TripId, UserId};
use crate::domain::ticket::{
    Passenger, PaymentMethod, Ticket, TicketCodes, TicketError, TicketSold,
};
use crate::ports::{EventPublisher, TicketRepository};

/// Number of code sets tried before a sale gives up on collisions.
pub const MAX_CODE_ATTEMPTS: u32 = 5;

/// Command to sell a ticket.
#[derive(Debug, Clone)]
pub struct SellTicketCommand {
    pub trip_id: TripId,
    /// Seat label; `None` for trips without seat assignment.
    pub seat_id: Option<String>,
    pub price: Money,
    pub payment_method: PaymentMethod,
    pub passenger: Passenger,
}

/// Result of a successful sale.
#[derive(Debug, Clone)]
pub struct SellTicketResult {
    pub ticket: Ticket,
    pub event: TicketSold,
}

/// Handler for selling tickets.
///
/// The seat check and the insert are one store call, so two sales of the
/// same seat cannot both succeed.
pub struct SellTicketHandler {
    tickets: Arc<dyn TicketRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    timeout: Duration,
}

impl SellTicketHandler {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        timeout: Duration,
    ) -> Self {
        Self {
            tickets,
            event_publisher,
            timeout,
        }
    }

    pub async fn handle(&self, cmd: SellTicketCommand) -> Result<SellTicketResult, TicketError> {
        let seat_id = cmd.seat_id.map(SeatId::new).transpose()?;

        let mut ticket = Ticket::sell(
            cmd.trip_id,
            seat_id,
            cmd.passenger,
            cmd.price,
            cmd.payment_method,
            TicketCodes::generate(),
            Timestamp::now(),
        )?;

        let mut attempt = 1;
        loop {
            match bounded(self.timeout, "insert ticket", self.tickets.insert(&ticket)).await {
                Ok(()) => break,
                Err(e) if e.code == ErrorCode::CodeCollision && attempt < MAX_CODE_ATTEMPTS => {
                    tracing::debug!(
                        ticket_id = %ticket.id,
                        attempt,
                        "Ticket code collision, reissuing codes"
                    );
                    ticket.reissue_codes(TicketCodes::generate());
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            ticket_id = %ticket.id,
            trip_id = %ticket.trip_id,
            price = %ticket.price,
            "Ticket sold"
        );

        let event = TicketSold::new(&ticket);
        publish_best_effort(
            self.event_publisher.as_ref(),
            self.timeout,
            &event,
            &UserId::system(),
        )
        .await;

        Ok(SellTicketResult { ticket, event })
    }
}
