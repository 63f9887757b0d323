//! In-memory ticket store.
//!
//! Implements both storage ports over one shared state so that a refund can
//! see the gate and a mark can see the ticket under the same lock, just as
//! the Postgres adapter does within one transaction.
//!
//! Single-process only: the lock is the arbiter, so two processes with their
//! own stores would each accept the same seat. Use the Postgres adapter for
//! anything deployed.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::boarding::{BoardingEvent, BoardingMark, BoardingScan};
use crate::domain::foundation::{DomainError, ErrorCode, SeatId, TicketId, Timestamp, TripId};
use crate::domain::refund::RefundQuote;
use crate::domain::stats::SalesStats;
use crate::domain::ticket::Ticket;
use crate::ports::{BoardingRepository, TicketRepository};

#[derive(Default)]
struct StoreState {
    tickets: HashMap<TicketId, Ticket>,
    /// Insertion order, for oldest-first listings.
    order: Vec<TicketId>,
    by_qr_code: HashMap<String, TicketId>,
    by_bar_code: HashMap<String, TicketId>,
    /// Seat ledger: only active tickets hold a seat.
    active_seats: HashMap<(TripId, SeatId), TicketId>,
    gates: HashMap<TripId, BoardingEvent>,
    marks: HashMap<TicketId, BoardingMark>,
}

impl StoreState {
    fn ticket(&self, id: &TicketId) -> Result<&Ticket, DomainError> {
        self.tickets.get(id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &TicketId) -> DomainError {
    DomainError::new(ErrorCode::TicketNotFound, format!("Ticket {} not found", id))
        .with_detail("ticket_id", id.to_string())
}

/// In-memory implementation of `TicketRepository` and `BoardingRepository`.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryTicketStore::new());
/// let tickets: Arc<dyn TicketRepository> = store.clone();
/// let boarding: Arc<dyn BoardingRepository> = store;
/// ```
#[derive(Default)]
pub struct InMemoryTicketStore {
    state: Mutex<StoreState>,
}

impl InMemoryTicketStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tickets.
    pub async fn len(&self) -> usize {
        self.state.lock().await.tickets.len()
    }

    /// Returns true if no tickets exist.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.tickets.is_empty()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;

        let seat_key = ticket
            .seat_id
            .as_ref()
            .filter(|_| ticket.is_active())
            .map(|seat| (ticket.trip_id, seat.clone()));

        if let Some(key) = &seat_key {
            if state.active_seats.contains_key(key) {
                return Err(DomainError::new(
                    ErrorCode::SeatTaken,
                    format!("Seat {} is taken on trip {}", key.1, key.0),
                ));
            }
        }

        if state.by_qr_code.contains_key(&ticket.qr_code)
            || state.by_bar_code.contains_key(&ticket.bar_code)
        {
            return Err(DomainError::new(
                ErrorCode::CodeCollision,
                "Ticket code already issued",
            ));
        }

        if state.tickets.contains_key(&ticket.id) {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Ticket {} already stored", ticket.id),
            ));
        }

        if let Some(key) = seat_key {
            state.active_seats.insert(key, ticket.id);
        }
        state.by_qr_code.insert(ticket.qr_code.clone(), ticket.id);
        state.by_bar_code.insert(ticket.bar_code.clone(), ticket.id);
        state.order.push(ticket.id);
        state.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
        Ok(self.state.lock().await.tickets.get(id).cloned())
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Ticket>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .by_qr_code
            .get(qr_code)
            .and_then(|id| state.tickets.get(id))
            .cloned())
    }

    async fn find_by_bar_code(&self, bar_code: &str) -> Result<Option<Ticket>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .by_bar_code
            .get(bar_code)
            .and_then(|id| state.tickets.get(id))
            .cloned())
    }

    async fn list_by_trip(&self, trip_id: &TripId) -> Result<Vec<Ticket>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.tickets.get(id))
            .filter(|t| &t.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn count_by_trip(&self, trip_id: &TripId) -> Result<u64, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .tickets
            .values()
            .filter(|t| &t.trip_id == trip_id)
            .count() as u64)
    }

    async fn apply_refund(
        &self,
        id: &TicketId,
        quote: &RefundQuote,
        at: Timestamp,
    ) -> Result<Ticket, DomainError> {
        let mut state = self.state.lock().await;

        let current = state.ticket(id)?;
        if !current.is_active() {
            return Err(DomainError::new(
                ErrorCode::TicketNotActive,
                format!("Ticket {} is already returned", id),
            ));
        }
        if state.gates.contains_key(&current.trip_id) {
            return Err(DomainError::new(
                ErrorCode::BoardingAlreadyStarted,
                format!("Boarding has started for trip {}", current.trip_id),
            ));
        }

        let mut ticket = current.clone();
        ticket.refund(quote, at).map_err(|e| {
            DomainError::new(ErrorCode::TicketNotActive, e.to_string())
        })?;

        if let Some(seat) = &ticket.seat_id {
            state.active_seats.remove(&(ticket.trip_id, seat.clone()));
        }
        state.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn sales_stats(&self, date: NaiveDate) -> Result<SalesStats, DomainError> {
        let state = self.state.lock().await;
        let mut stats = SalesStats::empty(date);
        for ticket in state.tickets.values() {
            stats.record(ticket);
        }
        Ok(stats)
    }
}

#[async_trait]
impl BoardingRepository for InMemoryTicketStore {
    async fn open_gate(&self, gate: &BoardingEvent) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.gates.contains_key(&gate.trip_id) {
            return Err(DomainError::new(
                ErrorCode::BoardingAlreadyStarted,
                format!("Boarding already started for trip {}", gate.trip_id),
            ));
        }
        state.gates.insert(gate.trip_id, gate.clone());
        Ok(())
    }

    async fn find_gate(&self, trip_id: &TripId) -> Result<Option<BoardingEvent>, DomainError> {
        Ok(self.state.lock().await.gates.get(trip_id).cloned())
    }

    async fn mark(&self, scan: BoardingScan) -> Result<BoardingMark, DomainError> {
        let mut state = self.state.lock().await;

        let ticket = state.ticket(&scan.ticket_id)?;
        if !ticket.is_active() {
            return Err(DomainError::new(
                ErrorCode::TicketNotActive,
                format!("Ticket {} is returned", ticket.id),
            ));
        }
        let trip_id = ticket.trip_id;
        if !state.gates.contains_key(&trip_id) {
            return Err(DomainError::new(
                ErrorCode::BoardingNotStarted,
                format!("Boarding has not started for trip {}", trip_id),
            ));
        }
        if state.marks.contains_key(&scan.ticket_id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyMarked,
                format!("Ticket {} already boarded", scan.ticket_id),
            ));
        }

        let mark = BoardingMark::from_scan(scan, trip_id);
        state.marks.insert(mark.ticket_id, mark.clone());
        Ok(mark)
    }

    async fn count_marks_by_trip(&self, trip_id: &TripId) -> Result<u64, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .marks
            .values()
            .filter(|m| &m.trip_id == trip_id)
            .count() as u64)
    }
}
