//! TicketService - the inbound surface of the ticket core.
//!
//! Transports (HTTP, gRPC, the controller app bridge) hold one
//! `TicketService` and call its methods; each method delegates to the
//! matching handler.
//!
//! # Example
//!
//! ```ignore
//! let service = TicketService::new(deps, ServiceSettings::default());
//! let ticket = service.sell_ticket(cmd).await?;
//! let quote = service.refund_ticket(ticket.id, UserId::new("cashier-1")?).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::domain::boarding::{BoardingEvent, BoardingMark, BoardingStatus};
use crate::domain::foundation::{TicketId, TripId, UserId};
use crate::domain::refund::{RefundPolicy, RefundQuote};
use crate::domain::stats::SalesStats;
use crate::domain::ticket::{Ticket, TicketError};
use crate::ports::{BoardingRepository, DepartureSchedule, EventPublisher, TicketRepository};

use super::handlers::{
    GetBoardingStatusHandler, GetBoardingStatusQuery, GetSalesStatsHandler, GetSalesStatsQuery,
    GetTicketHandler, GetTicketQuery, ListTripTicketsHandler, ListTripTicketsQuery,
    MarkBoardingCommand, MarkBoardingHandler, RefundTicketCommand, RefundTicketHandler,
    ScanTicketCommand, ScanTicketHandler, ScanTicketResult, SellTicketCommand, SellTicketHandler,
    StartBoardingCommand, StartBoardingHandler,
};

/// Deadline for each store or collaborator call when none is configured.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Ports the service runs against.
#[derive(Clone)]
pub struct ServiceDeps {
    pub tickets: Arc<dyn TicketRepository>,
    pub boarding: Arc<dyn BoardingRepository>,
    pub schedule: Arc<dyn DepartureSchedule>,
    pub events: Arc<dyn EventPublisher>,
}

/// Tunables, usually built from `AppConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceSettings {
    pub policy: RefundPolicy,
    /// Applied to every port call; elapsed calls fail as retryable.
    pub operation_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            policy: RefundPolicy::default(),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

/// Facade over the ticket and boarding handlers.
///
/// Safe to share across tasks; all state lives behind the ports.
pub struct TicketService {
    sell: SellTicketHandler,
    refund: RefundTicketHandler,
    get: GetTicketHandler,
    list: ListTripTicketsHandler,
    sales: GetSalesStatsHandler,
    start_boarding: StartBoardingHandler,
    mark: MarkBoardingHandler,
    scan: ScanTicketHandler,
    boarding_status: GetBoardingStatusHandler,
}

impl TicketService {
    pub fn new(deps: ServiceDeps, settings: ServiceSettings) -> Self {
        let timeout = settings.operation_timeout;
        Self {
            sell: SellTicketHandler::new(deps.tickets.clone(), deps.events.clone(), timeout),
            refund: RefundTicketHandler::new(
                deps.tickets.clone(),
                deps.schedule.clone(),
                deps.events.clone(),
                settings.policy,
                timeout,
            ),
            get: GetTicketHandler::new(deps.tickets.clone(), timeout),
            list: ListTripTicketsHandler::new(deps.tickets.clone(), timeout),
            sales: GetSalesStatsHandler::new(deps.tickets.clone(), timeout),
            start_boarding: StartBoardingHandler::new(
                deps.boarding.clone(),
                deps.events.clone(),
                timeout,
            ),
            mark: MarkBoardingHandler::new(deps.boarding.clone(), timeout),
            scan: ScanTicketHandler::new(deps.tickets.clone(), deps.boarding.clone(), timeout),
            boarding_status: GetBoardingStatusHandler::new(deps.tickets, deps.boarding, timeout),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tickets
    // ════════════════════════════════════════════════════════════════════════════

    pub async fn sell_ticket(&self, cmd: SellTicketCommand) -> Result<Ticket, TicketError> {
        self.sell.handle(cmd).await.map(|result| result.ticket)
    }

    pub async fn get_ticket(&self, id: TicketId) -> Result<Ticket, TicketError> {
        self.get.handle(GetTicketQuery::ById(id)).await
    }

    pub async fn get_ticket_by_qr(&self, qr_code: &str) -> Result<Ticket, TicketError> {
        self.get
            .handle(GetTicketQuery::ByQrCode(qr_code.to_string()))
            .await
    }

    pub async fn get_ticket_by_bar_code(&self, bar_code: &str) -> Result<Ticket, TicketError> {
        self.get
            .handle(GetTicketQuery::ByBarCode(bar_code.to_string()))
            .await
    }

    pub async fn list_tickets_by_trip(
        &self,
        trip_id: TripId,
    ) -> Result<Vec<Ticket>, TicketError> {
        self.list.handle(ListTripTicketsQuery { trip_id }).await
    }

    /// Returns a ticket and reports what was refunded.
    pub async fn refund_ticket(
        &self,
        ticket_id: TicketId,
        requested_by: UserId,
    ) -> Result<RefundQuote, TicketError> {
        self.refund
            .handle(RefundTicketCommand {
                ticket_id,
                requested_by,
            })
            .await
            .map(|result| result.quote)
    }

    pub async fn get_sales_stats(&self, date: NaiveDate) -> Result<SalesStats, TicketError> {
        self.sales.handle(GetSalesStatsQuery { date }).await
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Boarding
    // ════════════════════════════════════════════════════════════════════════════

    pub async fn start_boarding(
        &self,
        trip_id: TripId,
        started_by: UserId,
    ) -> Result<BoardingEvent, TicketError> {
        self.start_boarding
            .handle(StartBoardingCommand {
                trip_id,
                started_by,
            })
            .await
    }

    pub async fn mark_boarding(
        &self,
        cmd: MarkBoardingCommand,
    ) -> Result<BoardingMark, TicketError> {
        self.mark.handle(cmd).await
    }

    pub async fn scan_ticket(
        &self,
        code: &str,
        marked_by: UserId,
    ) -> Result<ScanTicketResult, TicketError> {
        self.scan
            .handle(ScanTicketCommand {
                code: code.to_string(),
                marked_by,
            })
            .await
    }

    pub async fn get_boarding_status(
        &self,
        trip_id: TripId,
    ) -> Result<BoardingStatus, TicketError> {
        self.boarding_status
            .handle(GetBoardingStatusQuery { trip_id })
            .await
    }
}
