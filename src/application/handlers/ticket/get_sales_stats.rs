//! GetSalesStatsHandler - Query handler for daily sales figures (admin).

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::application::support::bounded;
use crate::domain::stats::SalesStats;
use crate::domain::ticket::TicketError;
use crate::ports::TicketRepository;

/// Query for one UTC day of sales.
#[derive(Debug, Clone)]
pub struct GetSalesStatsQuery {
    pub date: NaiveDate,
}

pub type GetSalesStatsResult = SalesStats;

/// Handler for the dashboard's sales figures.
///
/// Revenue counts active tickets at full price and returned tickets at the
/// penalty the carrier kept.
pub struct GetSalesStatsHandler {
    tickets: Arc<dyn TicketRepository>,
    timeout: Duration,
}

impl GetSalesStatsHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>, timeout: Duration) -> Self {
        Self { tickets, timeout }
    }

    pub async fn handle(
        &self,
        query: GetSalesStatsQuery,
    ) -> Result<GetSalesStatsResult, TicketError> {
        let stats = bounded(
            self.timeout,
            "aggregate sales",
            self.tickets.sales_stats(query.date),
        )
        .await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTicketStore;
    use crate::domain::foundation::{Money, Timestamp, TripId};
    use crate::domain::refund::RefundPolicy;
    use crate::domain::ticket::{Passenger, PaymentMethod, Ticket, TicketCodes};

    fn ticket(price: i64) -> Ticket {
        Ticket::sell(
            TripId::new(),
            None,
            Passenger::anonymous(),
            Money::from_major(price),
            PaymentMethod::Card,
            TicketCodes::generate(),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn revenue_keeps_penalties_of_returned_tickets() {
        let store = Arc::new(InMemoryTicketStore::new());
        let kept = ticket(1000);
        let returned = ticket(1000);
        store.insert(&kept).await.unwrap();
        store.insert(&returned).await.unwrap();
        let quote = RefundPolicy::default().quote(returned.price, 30.0);
        store
            .apply_refund(&returned.id, &quote, Timestamp::now())
            .await
            .unwrap();

        let handler = GetSalesStatsHandler::new(store, Duration::from_secs(5));
        let stats = handler
            .handle(GetSalesStatsQuery {
                date: kept.created_at.date(),
            })
            .await
            .unwrap();

        assert_eq!(stats.tickets_sold, 2);
        assert_eq!(stats.tickets_returned, 1);
        assert_eq!(stats.revenue, Money::from_major(1100));
    }

    #[tokio::test]
    async fn other_days_are_empty() {
        let store = Arc::new(InMemoryTicketStore::new());
        let sold = ticket(500);
        store.insert(&sold).await.unwrap();
        let yesterday = sold.created_at.date().pred_opt().unwrap();

        let handler = GetSalesStatsHandler::new(store, Duration::from_secs(5));
        let stats = handler
            .handle(GetSalesStatsQuery { date: yesterday })
            .await
            .unwrap();

        assert_eq!(stats, SalesStats::empty(yesterday));
    }
}
