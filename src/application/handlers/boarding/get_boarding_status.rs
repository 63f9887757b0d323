//! GetBoardingStatusHandler - Query handler for the controller's boarding screen.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::bounded;
use crate::domain::boarding::BoardingStatus;
use crate::domain::foundation::TripId;
use crate::domain::ticket::TicketError;
use crate::ports::{BoardingRepository, TicketRepository};

#[derive(Debug, Clone)]
pub struct GetBoardingStatusQuery {
    pub trip_id: TripId,
}

pub type GetBoardingStatusResult = BoardingStatus;

/// Read-only view of a trip's boarding.
///
/// The three reads are not taken under one lock, so counts may lag a
/// concurrent sale or mark by one.
pub struct GetBoardingStatusHandler {
    tickets: Arc<dyn TicketRepository>,
    boarding: Arc<dyn BoardingRepository>,
    timeout: Duration,
}

impl GetBoardingStatusHandler {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        boarding: Arc<dyn BoardingRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            tickets,
            boarding,
            timeout,
        }
    }

    pub async fn handle(
        &self,
        query: GetBoardingStatusQuery,
    ) -> Result<GetBoardingStatusResult, TicketError> {
        let trip_id = query.trip_id;

        let gate = bounded(self.timeout, "load boarding gate", self.boarding.find_gate(&trip_id))
            .await?;
        let total_tickets = bounded(
            self.timeout,
            "count tickets",
            self.tickets.count_by_trip(&trip_id),
        )
        .await?;
        let boarded_count = match gate {
            Some(_) => {
                bounded(
                    self.timeout,
                    "count boarding marks",
                    self.boarding.count_marks_by_trip(&trip_id),
                )
                .await?
            }
            None => 0,
        };

        Ok(BoardingStatus::assemble(
            trip_id,
            gate.as_ref(),
            total_tickets,
            boarded_count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTicketStore;
    use crate::domain::boarding::{BoardingEvent, BoardingScan, ScanMethod};
    use crate::domain::foundation::{Money, Timestamp, UserId};
    use crate::domain::refund::RefundPolicy;
    use crate::domain::ticket::{Passenger, PaymentMethod, Ticket, TicketCodes};

    async fn sell(store: &InMemoryTicketStore, trip_id: TripId) -> Ticket {
        let ticket = Ticket::sell(
            trip_id,
            None,
            Passenger::anonymous(),
            Money::from_major(400),
            PaymentMethod::Card,
            TicketCodes::generate(),
            Timestamp::now(),
        )
        .unwrap();
        store.insert(&ticket).await.unwrap();
        ticket
    }

    fn handler(store: Arc<InMemoryTicketStore>) -> GetBoardingStatusHandler {
        GetBoardingStatusHandler::new(store.clone(), store, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn closed_gate_reports_nothing_boarded() {
        let store = Arc::new(InMemoryTicketStore::new());
        let trip = TripId::new();
        sell(&store, trip).await;
        sell(&store, trip).await;

        let status = handler(store)
            .handle(GetBoardingStatusQuery { trip_id: trip })
            .await
            .unwrap();

        assert!(!status.boarding_active);
        assert!(status.started_at.is_none());
        assert_eq!(status.total_tickets, 2);
        assert_eq!(status.boarded_count, 0);
    }

    #[tokio::test]
    async fn open_gate_counts_marks_and_every_sold_ticket() {
        let store = Arc::new(InMemoryTicketStore::new());
        let trip = TripId::new();
        let boarded = sell(&store, trip).await;
        sell(&store, trip).await;
        let returned = sell(&store, trip).await;
        let quote = RefundPolicy::default().quote(returned.price, 30.0);
        store
            .apply_refund(&returned.id, &quote, Timestamp::now())
            .await
            .unwrap();
        let gate = BoardingEvent::open(trip, UserId::system(), Timestamp::now());
        store.open_gate(&gate).await.unwrap();
        store
            .mark(BoardingScan {
                ticket_id: boarded.id,
                marked_by: UserId::system(),
                scan_method: ScanMethod::Qr,
                marked_at: Timestamp::now(),
            })
            .await
            .unwrap();

        let status = handler(store)
            .handle(GetBoardingStatusQuery { trip_id: trip })
            .await
            .unwrap();

        assert!(status.boarding_active);
        assert_eq!(status.started_at, Some(gate.started_at));
        assert_eq!(status.total_tickets, 3);
        assert_eq!(status.boarded_count, 1);
    }
}
