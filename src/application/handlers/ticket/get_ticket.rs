//! GetTicketHandler - Query handler for looking up a single ticket.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::bounded;
use crate::domain::foundation::TicketId;
use crate::domain::ticket::{Ticket, TicketError};
use crate::ports::TicketRepository;

/// How the ticket is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetTicketQuery {
    ById(TicketId),
    ByQrCode(String),
    ByBarCode(String),
}

pub type GetTicketResult = Ticket;

/// Handler for single-ticket lookups. A miss is `NotFound`.
pub struct GetTicketHandler {
    tickets: Arc<dyn TicketRepository>,
    timeout: Duration,
}

impl GetTicketHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>, timeout: Duration) -> Self {
        Self { tickets, timeout }
    }

    pub async fn handle(&self, query: GetTicketQuery) -> Result<GetTicketResult, TicketError> {
        match query {
            GetTicketQuery::ById(id) => {
                bounded(self.timeout, "load ticket", self.tickets.find_by_id(&id))
                    .await?
                    .ok_or(TicketError::ticket_not_found(id))
            }
            GetTicketQuery::ByQrCode(code) => {
                bounded(self.timeout, "load ticket", self.tickets.find_by_qr_code(&code))
                    .await?
                    .ok_or_else(|| TicketError::code_not_found(code))
            }
            GetTicketQuery::ByBarCode(code) => {
                bounded(self.timeout, "load ticket", self.tickets.find_by_bar_code(&code))
                    .await?
                    .ok_or_else(|| TicketError::code_not_found(code))
            }
        }
    }
}
