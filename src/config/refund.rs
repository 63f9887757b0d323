//! Refund penalty configuration

use serde::Deserialize;

use crate::domain::foundation::ValidationError as RateError;
use crate::domain::refund::{PenaltyTiers, RefundPolicy, DEFAULT_FALLBACK_HOURS};

use super::error::ValidationError;

/// Penalty tiers and the lead time assumed for unknown departures.
///
/// Rates are fractions of the ticket price kept by the carrier.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundConfig {
    /// Rate when more than 24 hours remain
    #[serde(default = "default_over_24_hours")]
    pub over_24_hours: f64,

    /// Rate when 12 to 24 hours remain
    #[serde(default = "default_between_12_and_24_hours")]
    pub between_12_and_24_hours: f64,

    /// Rate when less than 12 hours remain
    #[serde(default = "default_under_12_hours")]
    pub under_12_hours: f64,

    /// Lead time used when the departure cannot be resolved
    #[serde(default = "default_fallback_hours")]
    pub fallback_hours_until_departure: f64,
}

impl RefundConfig {
    fn tiers(&self) -> PenaltyTiers {
        PenaltyTiers {
            over_24_hours: self.over_24_hours,
            between_12_and_24_hours: self.between_12_and_24_hours,
            under_12_hours: self.under_12_hours,
        }
    }

    /// Builds the pricing policy. Call `validate` first.
    pub fn policy(&self) -> RefundPolicy {
        RefundPolicy::new(self.tiers(), self.fallback_hours_until_departure)
    }

    /// Validate refund configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let tiers = self.tiers();
        tiers
            .validate()
            .map_err(|err| invalid_rate(&tiers, &err))?;

        let hours = self.fallback_hours_until_departure;
        if !hours.is_finite() || hours < 0.0 {
            return Err(ValidationError::InvalidFallbackHours(hours));
        }
        Ok(())
    }
}

impl Default for RefundConfig {
    fn default() -> Self {
        Self {
            over_24_hours: default_over_24_hours(),
            between_12_and_24_hours: default_between_12_and_24_hours(),
            under_12_hours: default_under_12_hours(),
            fallback_hours_until_departure: default_fallback_hours(),
        }
    }
}

fn invalid_rate(tiers: &PenaltyTiers, err: &RateError) -> ValidationError {
    let (tier, value) = match err.field() {
        "over_24_hours" => ("over_24_hours", tiers.over_24_hours),
        "between_12_and_24_hours" => ("between_12_and_24_hours", tiers.between_12_and_24_hours),
        _ => ("under_12_hours", tiers.under_12_hours),
    };
    ValidationError::InvalidPenaltyRate { tier, value }
}

fn default_over_24_hours() -> f64 {
    PenaltyTiers::default().over_24_hours
}

fn default_between_12_and_24_hours() -> f64 {
    PenaltyTiers::default().between_12_and_24_hours
}

fn default_under_12_hours() -> f64 {
    PenaltyTiers::default().under_12_hours
}

fn default_fallback_hours() -> f64 {
    DEFAULT_FALLBACK_HOURS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    #[test]
    fn test_refund_config_defaults() {
        let config = RefundConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy(), RefundPolicy::default());
    }

    #[test]
    fn test_policy_uses_configured_rates() {
        let config = RefundConfig {
            over_24_hours: 0.0,
            between_12_and_24_hours: 0.5,
            under_12_hours: 1.0,
            fallback_hours_until_departure: 6.0,
        };
        let policy = config.policy();

        assert_eq!(policy.quote(Money::from_major(1000), 30.0).penalty, Money::ZERO);
        assert_eq!(
            policy.quote(Money::from_major(1000), 12.0).penalty,
            Money::from_major(500)
        );
        assert_eq!(policy.fallback_hours, 6.0);
    }

    #[test]
    fn test_validation_rate_out_of_range() {
        let config = RefundConfig {
            between_12_and_24_hours: 1.2,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidPenaltyRate {
                tier: "between_12_and_24_hours",
                value: 1.2
            })
        );

        let config = RefundConfig {
            under_12_hours: -0.1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidPenaltyRate {
                tier: "under_12_hours",
                value: -0.1
            })
        );
    }

    #[test]
    fn test_validation_matches_domain_tiers() {
        let config = RefundConfig {
            over_24_hours: f64::NAN,
            ..Default::default()
        };
        assert!(PenaltyTiers::new(f64::NAN, 0.2, 0.3).is_err());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPenaltyRate {
                tier: "over_24_hours",
                ..
            })
        ));
    }

    #[test]
    fn test_validation_fallback_hours() {
        for hours in [-1.0, f64::INFINITY] {
            let config = RefundConfig {
                fallback_hours_until_departure: hours,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        let config = RefundConfig {
            fallback_hours_until_departure: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
