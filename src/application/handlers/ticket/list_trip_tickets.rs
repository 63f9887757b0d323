//! ListTripTicketsHandler - Query handler for a trip's passenger list.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::bounded;
use crate::domain::foundation::TripId;
use crate::domain::ticket::{Ticket, TicketError};
use crate::ports::TicketRepository;

/// Query for every ticket sold on a trip, returned ones included.
#[derive(Debug, Clone)]
pub struct ListTripTicketsQuery {
    pub trip_id: TripId,
}

/// Tickets ordered oldest first.
pub type ListTripTicketsResult = Vec<Ticket>;

pub struct ListTripTicketsHandler {
    tickets: Arc<dyn TicketRepository>,
    timeout: Duration,
}

impl ListTripTicketsHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>, timeout: Duration) -> Self {
        Self { tickets, timeout }
    }

    pub async fn handle(
        &self,
        query: ListTripTicketsQuery,
    ) -> Result<ListTripTicketsResult, TicketError> {
        let tickets = bounded(
            self.timeout,
            "list trip tickets",
            self.tickets.list_by_trip(&query.trip_id),
        )
        .await?;
        Ok(tickets)
    }
}
