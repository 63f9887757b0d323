//! DepartureSchedule port - read access to trip departure times.
//!
//! Trips and schedules are owned by the scheduling service; the ticket core
//! only needs the departure instant to price refunds.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, TripId};

#[async_trait]
pub trait DepartureSchedule: Send + Sync {
    /// Departure instant of the trip, or `None` if the trip is unknown.
    async fn departure_time(&self, trip_id: &TripId) -> Result<Option<Timestamp>, DomainError>;
}
