//! Ticket repository port.
//!
//! Every check-then-write on tickets happens inside one call here so that
//! adapters can make it atomic (a transaction, a unique index, or a lock).
//!
//! # Example
//!
//! ```ignore
//! let quote = policy.quote(ticket.price, hours);
//! let returned = repo.apply_refund(&ticket.id, &quote, Timestamp::now()).await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, TicketId, Timestamp, TripId};
use crate::domain::refund::RefundQuote;
use crate::domain::stats::SalesStats;
use crate::domain::ticket::Ticket;

/// Repository port for ticket persistence.
///
/// Implementations must ensure:
/// - at most one active ticket per `(trip_id, seat_id)` when a seat is set
/// - `qr_code` and `bar_code` are unique across every ticket ever stored
/// - a refund re-checks status and the trip's gate atomically with the update
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Stores a newly sold ticket.
    ///
    /// # Errors
    ///
    /// - `SeatTaken` if another active ticket holds the seat
    /// - `CodeCollision` if the QR or barcode already exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError>;

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Ticket>, DomainError>;

    async fn find_by_bar_code(&self, bar_code: &str) -> Result<Option<Ticket>, DomainError>;

    /// All tickets for a trip, oldest first.
    async fn list_by_trip(&self, trip_id: &TripId) -> Result<Vec<Ticket>, DomainError>;

    /// Every ticket sold on the trip, returned ones included.
    async fn count_by_trip(&self, trip_id: &TripId) -> Result<u64, DomainError>;

    /// Returns the ticket with the quoted amounts applied.
    ///
    /// Must not interleave with opening the same trip's gate: either the
    /// refund commits first, or it observes the open gate and fails.
    ///
    /// # Errors
    ///
    /// - `TicketNotFound` if the ticket does not exist
    /// - `TicketNotActive` if it has already been returned
    /// - `BoardingAlreadyStarted` if the trip's gate is open
    async fn apply_refund(
        &self,
        id: &TicketId,
        quote: &RefundQuote,
        at: Timestamp,
    ) -> Result<Ticket, DomainError>;

    /// Sales figures for tickets created on `date` (UTC).
    async fn sales_stats(&self, date: NaiveDate) -> Result<SalesStats, DomainError>;
}
