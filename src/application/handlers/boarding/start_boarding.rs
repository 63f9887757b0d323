//! StartBoardingHandler - Command handler for opening a trip's boarding gate.

use std::sync::Arc;
use std::time::Duration;

use crate::application::support::{bounded, publish_best_effort};
use crate::domain::boarding::{BoardingEvent, BoardingStarted};
use crate::domain::foundation::{Timestamp, TripId, UserId};
use crate::domain::ticket::TicketError;
use crate::ports::{BoardingRepository, EventPublisher};

/// Command to open boarding on a trip.
#[derive(Debug, Clone)]
pub struct StartBoardingCommand {
    pub trip_id: TripId,
    pub started_by: UserId,
}

/// The gate as opened.
pub type StartBoardingResult = BoardingEvent;

/// Handler for opening the boarding gate.
///
/// The gate opens once per trip and never closes. Once it is open every
/// refund on the trip is refused.
pub struct StartBoardingHandler {
    boarding: Arc<dyn BoardingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    timeout: Duration,
}

impl StartBoardingHandler {
    pub fn new(
        boarding: Arc<dyn BoardingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        timeout: Duration,
    ) -> Self {
        Self {
            boarding,
            event_publisher,
            timeout,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartBoardingCommand,
    ) -> Result<StartBoardingResult, TicketError> {
        if cmd.trip_id.is_nil() {
            return Err(TicketError::validation("trip_id", "trip_id is required"));
        }

        let gate = BoardingEvent::open(cmd.trip_id, cmd.started_by, Timestamp::now());
        bounded(self.timeout, "open boarding", self.boarding.open_gate(&gate)).await?;

        tracing::info!(
            trip_id = %gate.trip_id,
            started_by = %gate.started_by,
            "Boarding started"
        );

        publish_best_effort(
            self.event_publisher.as_ref(),
            self.timeout,
            &BoardingStarted::new(&gate),
            &gate.started_by,
        )
        .await;

        Ok(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryTicketStore;
    use crate::domain::ticket::ConflictReason;

    fn command(trip_id: TripId) -> StartBoardingCommand {
        StartBoardingCommand {
            trip_id,
            started_by: UserId::new("dispatcher").unwrap(),
        }
    }

    #[tokio::test]
    async fn opens_gate_and_announces_it() {
        let store = Arc::new(InMemoryTicketStore::new());
        let events = Arc::new(InMemoryEventBus::new());
        let handler =
            StartBoardingHandler::new(store.clone(), events.clone(), Duration::from_secs(5));
        let trip = TripId::new();

        let gate = handler.handle(command(trip)).await.unwrap();

        assert_eq!(gate.trip_id, trip);
        assert!(store.find_gate(&trip).await.unwrap().is_some());
        let started = events.events_of_type("boarding.started");
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].aggregate_id, trip.to_string());
        assert_eq!(started[0].payload["started_by"], "dispatcher");
    }

    #[tokio::test]
    async fn second_start_is_a_conflict() {
        let events = Arc::new(InMemoryEventBus::new());
        let handler = StartBoardingHandler::new(
            Arc::new(InMemoryTicketStore::new()),
            events.clone(),
            Duration::from_secs(5),
        );
        let trip = TripId::new();
        handler.handle(command(trip)).await.unwrap();

        let err = handler.handle(command(trip)).await.unwrap_err();

        assert_eq!(err, TicketError::conflict(ConflictReason::BoardingAlreadyStarted));
        assert_eq!(events.events_of_type("boarding.started").len(), 1);
    }

    #[tokio::test]
    async fn nil_trip_is_rejected() {
        let handler = StartBoardingHandler::new(
            Arc::new(InMemoryTicketStore::new()),
            Arc::new(InMemoryEventBus::new()),
            Duration::from_secs(5),
        );

        let err = handler
            .handle(command(TripId::from_uuid(uuid::Uuid::nil())))
            .await
            .unwrap_err();

        assert!(matches!(err, TicketError::Validation { ref field, .. } if field == "trip_id"));
    }

    #[tokio::test]
    async fn publish_failure_keeps_gate_open() {
        let store = Arc::new(InMemoryTicketStore::new());
        let handler = StartBoardingHandler::new(
            store.clone(),
            Arc::new(InMemoryEventBus::failing()),
            Duration::from_secs(5),
        );
        let trip = TripId::new();

        handler.handle(command(trip)).await.unwrap();

        assert!(store.find_gate(&trip).await.unwrap().is_some());
    }
}
