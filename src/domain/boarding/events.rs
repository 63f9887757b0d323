//! Boarding domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, Timestamp, TripId, UserId};

use super::BoardingEvent;

/// Published on `boarding.started` once a trip's gate opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardingStarted {
    pub event_id: EventId,
    pub trip_id: TripId,
    pub started_at: Timestamp,
    pub started_by: UserId,
}

impl BoardingStarted {
    pub fn new(gate: &BoardingEvent) -> Self {
        Self {
            event_id: EventId::new(),
            trip_id: gate.trip_id,
            started_at: gate.started_at,
            started_by: gate.started_by.clone(),
        }
    }
}

domain_event!(BoardingStarted {
    event_type: "boarding.started",
    aggregate: Trip(trip_id),
    occurred_at: started_at,
});
