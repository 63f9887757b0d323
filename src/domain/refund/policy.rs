//! Refund penalty policy.
//!
//! Pure pricing: given a ticket price and the time left until departure,
//! decide how much is retained and how much goes back to the passenger.
//!
//! | Hours until departure | Penalty rate |
//! |-----------------------|--------------|
//! | more than 24          | `over_24_hours` (10%) |
//! | 12 to 24 inclusive    | `between_12_and_24_hours` (20%) |
//! | under 12              | `under_12_hours` (30%) |

use crate::domain::foundation::{Money, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Hours assumed when a trip's departure time cannot be resolved.
///
/// Lands in the lowest tier so an unknown departure never overcharges.
pub const DEFAULT_FALLBACK_HOURS: f64 = 25.0;

const UPPER_BOUNDARY_HOURS: f64 = 24.0;
const LOWER_BOUNDARY_HOURS: f64 = 12.0;

/// Penalty rates, each a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTiers {
    pub over_24_hours: f64,
    pub between_12_and_24_hours: f64,
    pub under_12_hours: f64,
}

impl PenaltyTiers {
    /// Creates validated tiers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` naming the first rate outside `[0, 1]`.
    pub fn new(
        over_24_hours: f64,
        between_12_and_24_hours: f64,
        under_12_hours: f64,
    ) -> Result<Self, ValidationError> {
        let tiers = Self {
            over_24_hours,
            between_12_and_24_hours,
            under_12_hours,
        };
        tiers.validate()?;
        Ok(tiers)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, rate) in [
            ("over_24_hours", self.over_24_hours),
            ("between_12_and_24_hours", self.between_12_and_24_hours),
            ("under_12_hours", self.under_12_hours),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ValidationError::invalid_format(
                    field,
                    format!("rate must be within [0, 1], got {}", rate),
                ));
            }
        }
        Ok(())
    }
}

impl Default for PenaltyTiers {
    fn default() -> Self {
        Self {
            over_24_hours: 0.10,
            between_12_and_24_hours: 0.20,
            under_12_hours: 0.30,
        }
    }
}

/// Outcome of pricing a refund.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefundQuote {
    pub original_amount: Money,
    pub penalty: Money,
    pub refund_amount: Money,
    /// Rate that produced `penalty`.
    pub penalty_rate: f64,
}

/// Tiered refund policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefundPolicy {
    pub tiers: PenaltyTiers,
    pub fallback_hours: f64,
}

impl RefundPolicy {
    pub fn new(tiers: PenaltyTiers, fallback_hours: f64) -> Self {
        Self {
            tiers,
            fallback_hours,
        }
    }

    /// Penalty rate for the given lead time. Negative or NaN hours count as 0.
    pub fn rate_for(&self, hours_until_departure: f64) -> f64 {
        let hours = if hours_until_departure.is_nan() {
            0.0
        } else {
            hours_until_departure.max(0.0)
        };

        if hours > UPPER_BOUNDARY_HOURS {
            self.tiers.over_24_hours
        } else if hours >= LOWER_BOUNDARY_HOURS {
            self.tiers.between_12_and_24_hours
        } else {
            self.tiers.under_12_hours
        }
    }

    /// Prices a refund. `penalty + refund_amount == price` always holds.
    pub fn quote(&self, price: Money, hours_until_departure: f64) -> RefundQuote {
        let penalty_rate = self.rate_for(hours_until_departure);
        let penalty = price.apply_rate(penalty_rate);
        let refund_amount = price.checked_sub(penalty).unwrap_or(Money::ZERO);

        RefundQuote {
            original_amount: price,
            penalty,
            refund_amount,
            penalty_rate,
        }
    }

    /// Fractional hours from `now` until `departure`; negative once departed.
    pub fn hours_until(departure: &Timestamp, now: &Timestamp) -> f64 {
        departure.hours_since(now)
    }

    /// Lead time for a possibly unknown departure, using the fallback when absent.
    pub fn lead_time(&self, departure: Option<&Timestamp>, now: &Timestamp) -> f64 {
        match departure {
            Some(departure) => Self::hours_until(departure, now),
            None => self.fallback_hours,
        }
    }
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self::new(PenaltyTiers::default(), DEFAULT_FALLBACK_HOURS)
    }
}
