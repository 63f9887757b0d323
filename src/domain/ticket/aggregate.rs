//! Ticket aggregate entity.
//!
//! # Design Decisions
//!
//! - **Money in kopecks**: `price` and refund amounts are `Money`, never floats
//! - **Single mutation**: a ticket changes once, from active to returned
//! - **Boarding is external**: marks live beside the ticket, not on it

use crate::domain::foundation::{
    Money, SeatId, StateMachine, TicketId, Timestamp, TripId, ValidationError,
};
use crate::domain::refund::RefundQuote;
use serde::{Deserialize, Serialize};

use super::{Passenger, PaymentMethod, TicketCodes, TicketStatus};

/// Refund bookkeeping, present only on returned tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundDetails {
    pub refunded_at: Timestamp,
    pub refund_amount: Money,
    pub refund_penalty: Money,
}

/// A sold ticket.
///
/// # Invariants
///
/// - `price` is positive
/// - `qr_code` and `bar_code` are unique across all tickets (store-enforced)
/// - at most one active ticket per `(trip_id, seat_id)` (store-enforced)
/// - `refund` is `Some` iff `status == Returned`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub trip_id: TripId,
    pub seat_id: Option<SeatId>,
    pub passenger: Passenger,
    pub price: Money,
    pub status: TicketStatus,
    pub payment_method: PaymentMethod,
    pub qr_code: String,
    pub bar_code: String,
    pub refund: Option<RefundDetails>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ticket {
    /// Creates a new active ticket.
    ///
    /// # Errors
    ///
    /// - `EmptyField("trip_id")` for a nil trip
    /// - `NotPositive("price")` for a zero or negative price
    /// - passenger format errors
    pub fn sell(
        trip_id: TripId,
        seat_id: Option<SeatId>,
        passenger: Passenger,
        price: Money,
        payment_method: PaymentMethod,
        codes: TicketCodes,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if trip_id.is_nil() {
            return Err(ValidationError::empty_field("trip_id"));
        }
        if !price.is_positive() {
            return Err(ValidationError::not_positive("price", price.minor()));
        }
        let passenger = passenger.normalized();
        passenger.validate()?;

        Ok(Self {
            id: TicketId::new(),
            trip_id,
            seat_id,
            passenger,
            price,
            status: TicketStatus::Active,
            payment_method,
            qr_code: codes.qr_code,
            bar_code: codes.bar_code,
            refund: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the scannable codes after the store reported a collision.
    pub fn reissue_codes(&mut self, codes: TicketCodes) {
        self.qr_code = codes.qr_code;
        self.bar_code = codes.bar_code;
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Marks the ticket returned with the quoted amounts.
    ///
    /// # Errors
    ///
    /// Returns a transition error if the ticket is already returned.
    pub fn refund(&mut self, quote: &RefundQuote, at: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(TicketStatus::Returned)?;
        self.refund = Some(RefundDetails {
            refunded_at: at,
            refund_amount: quote.refund_amount,
            refund_penalty: quote.penalty,
        });
        self.updated_at = at;
        Ok(())
    }

    /// Penalty retained by the carrier; zero while active.
    pub fn retained_penalty(&self) -> Money {
        self.refund
            .as_ref()
            .map(|r| r.refund_penalty)
            .unwrap_or(Money::ZERO)
    }
}
