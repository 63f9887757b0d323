//! Refund pricing.

mod policy;

pub use policy::{PenaltyTiers, RefundPolicy, RefundQuote, DEFAULT_FALLBACK_HOURS};
