//! Audit trail records handed to the audit-log collaborator.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{domain_event, EventId, Money, Timestamp, UserId};
use crate::domain::ticket::Ticket;

/// Published on `audit.log` for operations that move money.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogged {
    pub event_id: EventId,
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub user_id: UserId,
    pub old_value: JsonValue,
    pub new_value: JsonValue,
    pub timestamp: Timestamp,
}

impl AuditLogged {
    /// Refund record: old value is the price, new value the refunded amount,
    /// both in major units.
    pub fn refund(ticket: &Ticket, refund_amount: Money, user_id: UserId) -> Self {
        Self {
            event_id: EventId::new(),
            entity_type: "ticket".to_string(),
            entity_id: ticket.id.to_string(),
            action: "refund".to_string(),
            user_id,
            old_value: JsonValue::from(ticket.price.as_major_f64()),
            new_value: JsonValue::from(refund_amount.as_major_f64()),
            timestamp: ticket.updated_at,
        }
    }
}

domain_event!(AuditLogged {
    event_type: "audit.log",
    aggregate: AuditRecord(entity_id),
    occurred_at: timestamp,
});
