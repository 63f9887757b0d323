//! RefundTicketHandler - Command handler for returning tickets.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::{bounded, publish_best_effort};
use crate::domain::audit::AuditLogged;
use crate::domain::foundation::{TicketId, Timestamp, UserId};
use crate::domain::refund::{RefundPolicy, RefundQuote};
use crate::domain::ticket::{ConflictReason, Ticket, TicketError, TicketReturned};
use crate::ports::{DepartureSchedule, EventPublisher, TicketRepository};

/// Command to return a ticket.
#[derive(Debug, Clone)]
pub struct RefundTicketCommand {
    pub ticket_id: TicketId,
    pub requested_by: UserId,
}

/// Result of a successful refund.
#[derive(Debug, Clone)]
pub struct RefundTicketResult {
    /// The ticket as stored after the refund.
    pub ticket: Ticket,
    pub quote: RefundQuote,
    /// Lead time the quote was priced at.
    pub hours_until_departure: f64,
}

/// Handler for refunds.
///
/// The status and boarding checks are repeated inside
/// `TicketRepository::apply_refund`; the early check here only avoids a
/// schedule lookup for tickets that cannot be refunded.
pub struct RefundTicketHandler {
    tickets: Arc<dyn TicketRepository>,
    schedule: Arc<dyn DepartureSchedule>,
    event_publisher: Arc<dyn EventPublisher>,
    policy: RefundPolicy,
    timeout: Duration,
}

impl RefundTicketHandler {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        schedule: Arc<dyn DepartureSchedule>,
        event_publisher: Arc<dyn EventPublisher>,
        policy: RefundPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            tickets,
            schedule,
            event_publisher,
            policy,
            timeout,
        }
    }

    pub async fn handle(
        &self,
        cmd: RefundTicketCommand,
    ) -> Result<RefundTicketResult, TicketError> {
        // 1. Load and pre-check
        let ticket = bounded(
            self.timeout,
            "load ticket",
            self.tickets.find_by_id(&cmd.ticket_id),
        )
        .await?
        .ok_or(TicketError::ticket_not_found(cmd.ticket_id))?;

        if !ticket.is_active() {
            return Err(TicketError::conflict(ConflictReason::TicketNotActive));
        }

        // 2. Price the refund
        let now = Timestamp::now();
        let departure = self.departure_time(&ticket).await;
        let hours_until_departure = self.policy.lead_time(departure.as_ref(), &now);
        let quote = self.policy.quote(ticket.price, hours_until_departure);

        // 3. Apply atomically
        let returned = bounded(
            self.timeout,
            "apply refund",
            self.tickets.apply_refund(&ticket.id, &quote, now),
        )
        .await?;

        tracing::info!(
            ticket_id = %returned.id,
            trip_id = %returned.trip_id,
            refund_amount = %quote.refund_amount,
            penalty = %quote.penalty,
            "Ticket returned"
        );

        // 4. Announce
        publish_best_effort(
            self.event_publisher.as_ref(),
            self.timeout,
            &TicketReturned::new(&returned),
            &cmd.requested_by,
        )
        .await;
        publish_best_effort(
            self.event_publisher.as_ref(),
            self.timeout,
            &AuditLogged::refund(&returned, quote.refund_amount, cmd.requested_by.clone()),
            &cmd.requested_by,
        )
        .await;

        Ok(RefundTicketResult {
            ticket: returned,
            quote,
            hours_until_departure,
        })
    }

    /// Departure instant, or `None` when it cannot be determined.
    async fn departure_time(&self, ticket: &Ticket) -> Option<Timestamp> {
        match bounded(
            self.timeout,
            "load departure time",
            self.schedule.departure_time(&ticket.trip_id),
        )
        .await
        {
            Ok(Some(departs_at)) => Some(departs_at),
            Ok(None) => {
                tracing::warn!(
                    ticket_id = %ticket.id,
                    trip_id = %ticket.trip_id,
                    fallback_hours = self.policy.fallback_hours,
                    "Departure time unknown, using fallback lead time"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    ticket_id = %ticket.id,
                    trip_id = %ticket.trip_id,
                    fallback_hours = self.policy.fallback_hours,
                    error = %e,
                    "Failed to load departure time, using fallback lead time"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{FixedDepartureSchedule, InMemoryTicketStore};
    use crate::domain::boarding::BoardingEvent;
    use crate::domain::foundation::{Money, TripId};
    use crate::domain::ticket::{Passenger, PaymentMethod, TicketCodes, TicketStatus};
    use crate::ports::BoardingRepository;

    struct Fixture {
        store: Arc<InMemoryTicketStore>,
        schedule: Arc<FixedDepartureSchedule>,
        events: Arc<InMemoryEventBus>,
        handler: RefundTicketHandler,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryTicketStore::new());
        let schedule = Arc::new(FixedDepartureSchedule::new());
        let events = Arc::new(InMemoryEventBus::new());
        let handler = RefundTicketHandler::new(
            store.clone(),
            schedule.clone(),
            events.clone(),
            RefundPolicy::default(),
            Duration::from_secs(5),
        );
        Fixture {
            store,
            schedule,
            events,
            handler,
        }
    }

    async fn sold_ticket(store: &InMemoryTicketStore, trip_id: TripId) -> Ticket {
        let ticket = Ticket::sell(
            trip_id,
            None,
            Passenger::anonymous(),
            Money::from_major(1000),
            PaymentMethod::Cash,
            TicketCodes::generate(),
            Timestamp::now(),
        )
        .unwrap();
        store.insert(&ticket).await.unwrap();
        ticket
    }

    fn command(ticket_id: TicketId) -> RefundTicketCommand {
        RefundTicketCommand {
            ticket_id,
            requested_by: UserId::new("cashier-1").unwrap(),
        }
    }

    #[tokio::test]
    async fn penalty_follows_lead_time() {
        for (hours, penalty, refund) in [(30, 100, 900), (18, 200, 800), (5, 300, 700)] {
            let f = fixture();
            let trip = TripId::new();
            f.schedule.set(trip, Timestamp::now().plus_hours(hours));
            let ticket = sold_ticket(&f.store, trip).await;

            let result = f.handler.handle(command(ticket.id)).await.unwrap();

            assert_eq!(result.quote.penalty, Money::from_major(penalty), "{}h", hours);
            assert_eq!(result.quote.refund_amount, Money::from_major(refund), "{}h", hours);
            assert_eq!(result.ticket.status, TicketStatus::Returned);
        }
    }

    #[tokio::test]
    async fn unknown_departure_uses_fallback_tier() {
        let f = fixture();
        let ticket = sold_ticket(&f.store, TripId::new()).await;

        let result = f.handler.handle(command(ticket.id)).await.unwrap();

        assert_eq!(result.hours_until_departure, 25.0);
        assert_eq!(result.quote.penalty, Money::from_major(100));
    }

    #[tokio::test]
    async fn schedule_failure_uses_fallback_tier() {
        let f = fixture();
        f.schedule.set_failing(true);
        let ticket = sold_ticket(&f.store, TripId::new()).await;

        let result = f.handler.handle(command(ticket.id)).await.unwrap();

        assert_eq!(result.quote.refund_amount, Money::from_major(900));
    }

    #[tokio::test]
    async fn publishes_return_and_audit_events() {
        let f = fixture();
        let ticket = sold_ticket(&f.store, TripId::new()).await;

        f.handler.handle(command(ticket.id)).await.unwrap();

        assert_eq!(f.events.events_of_type("ticket.returned").len(), 1);
        let audit = f.events.events_of_type("audit.log");
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].payload["action"], "refund");
        assert_eq!(audit[0].payload["old_value"], 1000.0);
        assert_eq!(audit[0].payload["new_value"], 900.0);
        assert_eq!(audit[0].metadata.user_id.as_deref(), Some("cashier-1"));
    }

    #[tokio::test]
    async fn second_refund_is_rejected() {
        let f = fixture();
        let ticket = sold_ticket(&f.store, TripId::new()).await;
        f.handler.handle(command(ticket.id)).await.unwrap();

        let err = f.handler.handle(command(ticket.id)).await.unwrap_err();

        assert_eq!(err, TicketError::conflict(ConflictReason::TicketNotActive));
        assert_eq!(f.events.events_of_type("ticket.returned").len(), 1);
    }

    #[tokio::test]
    async fn refund_after_boarding_started_is_rejected() {
        let f = fixture();
        let trip = TripId::new();
        let ticket = sold_ticket(&f.store, trip).await;
        f.store
            .open_gate(&BoardingEvent::open(trip, UserId::system(), Timestamp::now()))
            .await
            .unwrap();

        let err = f.handler.handle(command(ticket.id)).await.unwrap_err();

        assert_eq!(err, TicketError::conflict(ConflictReason::BoardingAlreadyStarted));
        let stored = f.store.find_by_id(&ticket.id).await.unwrap().unwrap();
        assert!(stored.is_active());
    }

    #[tokio::test]
    async fn missing_ticket_is_not_found() {
        let f = fixture();
        let id = TicketId::new();

        let err = f.handler.handle(command(id)).await.unwrap_err();

        assert_eq!(err, TicketError::ticket_not_found(id));
    }

    #[tokio::test]
    async fn publish_failure_keeps_refund() {
        let f = fixture();
        f.events.set_failing(true);
        let ticket = sold_ticket(&f.store, TripId::new()).await;

        f.handler.handle(command(ticket.id)).await.unwrap();

        let stored = f.store.find_by_id(&ticket.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TicketStatus::Returned);
    }
}
