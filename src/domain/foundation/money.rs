//! Money value object stored in minor currency units.
//!
//! Arithmetic stays in kopecks. On the wire (every event payload and any
//! other JSON) an amount is a number of major units, so `Money::from_minor(100_050)`
//! serializes as `1000.5`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const MINOR_PER_MAJOR: i64 = 100;

/// Amount of money in minor units (kopecks). Never a float in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from minor units.
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole major units (1000 -> 1000.00).
    ///
    /// Saturates at `i64::MAX` kopecks.
    pub const fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Parses a major-unit wire amount, rounding to the nearest kopeck.
    ///
    /// Returns `None` for NaN, infinities and amounts outside the `i64`
    /// kopeck range.
    pub fn from_major_f64(major: f64) -> Option<Self> {
        let minor = (major * MINOR_PER_MAJOR as f64).round();
        if minor.is_finite() && minor.abs() < i64::MAX as f64 {
            Some(Self(minor as i64))
        } else {
            None
        }
    }

    /// Returns the amount in minor units.
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the amount in major units as a float, for display and JSON only.
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Returns true for amounts strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies by a fractional rate, rounding half away from zero.
    pub fn apply_rate(&self, rate: f64) -> Money {
        Money((self.0 as f64 * rate).round() as i64)
    }

    /// Subtraction that returns `None` on overflow.
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Addition that saturates instead of overflowing.
    pub fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let major = f64::deserialize(deserializer)?;
        Money::from_major_f64(major)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {}", major)))
    }
}
