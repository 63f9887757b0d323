//! Boarding gate records.
//!
//! A trip's gate is a one-way latch: once a `BoardingEvent` exists, boarding
//! is open for good. Each ticket can then be marked at most once.

use crate::domain::foundation::{TicketId, Timestamp, TripId, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The latch that opened boarding for a trip. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingEvent {
    pub trip_id: TripId,
    pub started_at: Timestamp,
    pub started_by: UserId,
}

impl BoardingEvent {
    pub fn open(trip_id: TripId, started_by: UserId, started_at: Timestamp) -> Self {
        Self {
            trip_id,
            started_at,
            started_by,
        }
    }
}

/// How the controller identified the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMethod {
    Qr,
    Barcode,
    /// Typed in by hand from the paper ticket.
    Manual,
}

impl ScanMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMethod::Qr => "qr",
            ScanMethod::Barcode => "barcode",
            ScanMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for ScanMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qr" => Ok(ScanMethod::Qr),
            "barcode" => Ok(ScanMethod::Barcode),
            "manual" => Ok(ScanMethod::Manual),
            other => Err(ValidationError::invalid_format(
                "scan_method",
                format!("unknown scan method '{}'", other),
            )),
        }
    }
}

/// A request to record one boarded passenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardingScan {
    pub ticket_id: TicketId,
    pub marked_by: UserId,
    pub scan_method: ScanMethod,
    pub marked_at: Timestamp,
}

/// A passenger recorded as boarded. At most one per ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingMark {
    pub ticket_id: TicketId,
    pub trip_id: TripId,
    pub marked_at: Timestamp,
    pub marked_by: UserId,
    pub scan_method: ScanMethod,
}

impl BoardingMark {
    pub fn from_scan(scan: BoardingScan, trip_id: TripId) -> Self {
        Self {
            ticket_id: scan.ticket_id,
            trip_id,
            marked_at: scan.marked_at,
            marked_by: scan.marked_by,
            scan_method: scan.scan_method,
        }
    }
}

/// Read model for the controller's boarding screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingStatus {
    pub trip_id: TripId,
    pub boarding_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    /// Every ticket sold on the trip, returned ones included.
    pub total_tickets: u64,
    pub boarded_count: u64,
}

impl BoardingStatus {
    /// Assembles the view. A closed gate always reports zero boarded.
    pub fn assemble(
        trip_id: TripId,
        gate: Option<&BoardingEvent>,
        total_tickets: u64,
        boarded_count: u64,
    ) -> Self {
        Self {
            trip_id,
            boarding_active: gate.is_some(),
            started_at: gate.map(|g| g.started_at),
            total_tickets,
            boarded_count: if gate.is_some() { boarded_count } else { 0 },
        }
    }
}
