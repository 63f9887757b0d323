//! Ticket domain events.
//!
//! - `TicketSold` - published on `ticket.sold` after a sale commits
//! - `TicketReturned` - published on `ticket.returned` after a refund commits
//!
//! Both carry the full ticket so receipt printing and notification services
//! need no lookup.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, TicketId, Timestamp};

use super::Ticket;

// ════════════════════════════════════════════════════════════════════════════
// TicketSold
// ════════════════════════════════════════════════════════════════════════════

/// Published when a ticket has been sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSold {
    pub event_id: EventId,
    pub ticket_id: TicketId,
    pub ticket: Ticket,
    pub sold_at: Timestamp,
}

impl TicketSold {
    pub fn new(ticket: &Ticket) -> Self {
        Self {
            event_id: EventId::new(),
            ticket_id: ticket.id,
            ticket: ticket.clone(),
            sold_at: ticket.created_at,
        }
    }
}

domain_event!(TicketSold {
    event_type: "ticket.sold",
    aggregate: Ticket(ticket_id),
    occurred_at: sold_at,
});

// ════════════════════════════════════════════════════════════════════════════
// TicketReturned
// ════════════════════════════════════════════════════════════════════════════

/// Published when a ticket has been refunded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketReturned {
    pub event_id: EventId,
    pub ticket_id: TicketId,
    pub ticket: Ticket,
    pub returned_at: Timestamp,
}

impl TicketReturned {
    pub fn new(ticket: &Ticket) -> Self {
        let returned_at = ticket
            .refund
            .as_ref()
            .map(|r| r.refunded_at)
            .unwrap_or(ticket.updated_at);
        Self {
            event_id: EventId::new(),
            ticket_id: ticket.id,
            ticket: ticket.clone(),
            returned_at,
        }
    }
}

domain_event!(TicketReturned {
    event_type: "ticket.returned",
    aggregate: Ticket(ticket_id),
    occurred_at: returned_at,
});
