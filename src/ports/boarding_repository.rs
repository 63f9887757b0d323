//! Boarding repository port.

use async_trait::async_trait;

use crate::domain::boarding::{BoardingEvent, BoardingMark, BoardingScan};
use crate::domain::foundation::{DomainError, TripId};

/// Repository port for boarding gates and marks.
///
/// Implementations must ensure:
/// - at most one `BoardingEvent` per trip, and opening it excludes any
///   in-flight refund on that trip
/// - at most one `BoardingMark` per ticket
#[async_trait]
pub trait BoardingRepository: Send + Sync {
    /// Opens the trip's gate.
    ///
    /// # Errors
    ///
    /// - `BoardingAlreadyStarted` if the gate is already open
    /// - `DatabaseError` on persistence failure
    async fn open_gate(&self, gate: &BoardingEvent) -> Result<(), DomainError>;

    async fn find_gate(&self, trip_id: &TripId) -> Result<Option<BoardingEvent>, DomainError>;

    /// Records one boarded passenger, checking the ticket and gate in the same unit.
    ///
    /// # Errors
    ///
    /// - `TicketNotFound` if the ticket does not exist
    /// - `TicketNotActive` if it has been returned
    /// - `BoardingNotStarted` if the trip's gate is closed
    /// - `AlreadyMarked` if the ticket was marked before
    async fn mark(&self, scan: BoardingScan) -> Result<BoardingMark, DomainError>;

    async fn count_marks_by_trip(&self, trip_id: &TripId) -> Result<u64, DomainError>;
}
