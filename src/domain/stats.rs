//! Daily sales figures for the admin dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;
use crate::domain::ticket::Ticket;

/// Sales for tickets created on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesStats {
    pub date: NaiveDate,
    pub tickets_sold: u64,
    pub tickets_returned: u64,
    /// Prices of still-active tickets plus penalties kept on returned ones.
    pub revenue: Money,
}

impl SalesStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            tickets_sold: 0,
            tickets_returned: 0,
            revenue: Money::ZERO,
        }
    }

    /// Folds one ticket into the totals. Tickets from other days are ignored.
    pub fn record(&mut self, ticket: &Ticket) {
        if ticket.created_at.date() != self.date {
            return;
        }
        self.tickets_sold += 1;
        if ticket.is_active() {
            self.revenue = self.revenue.saturating_add(ticket.price);
        } else {
            self.tickets_returned += 1;
            self.revenue = self.revenue.saturating_add(ticket.retained_penalty());
        }
    }
}
