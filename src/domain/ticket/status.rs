//! Ticket status state machine.
//!
//! A ticket is sold `Active` and may be returned exactly once. Boarding
//! never changes the status.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Sold and valid for travel.
    Active,

    /// Refunded. Terminal.
    Returned,
}

impl TicketStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Active => "active",
            TicketStatus::Returned => "returned",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TicketStatus::Active)
    }
}

impl StateMachine for TicketStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            TicketStatus::Active => &[TicketStatus::Returned],
            TicketStatus::Returned => &[],
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TicketStatus::Active),
            "returned" => Ok(TicketStatus::Returned),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown ticket status '{}'", other),
            )),
        }
    }
}
