//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Fractional hours from `other` until this timestamp. Negative when
    /// this timestamp is already in the past relative to `other`.
    pub fn hours_since(&self, other: &Timestamp) -> f64 {
        self.duration_since(other).num_milliseconds() as f64 / 3_600_000.0
    }

    /// Creates a new timestamp by adding whole minutes (negative subtracts).
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Creates a new timestamp by adding whole hours (negative subtracts).
    pub fn plus_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }

    /// Calendar date (UTC) of this timestamp.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed(h: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 3, 14, h, 0, 0).unwrap())
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn ordering_helpers_agree() {
        assert!(fixed(1).is_before(&fixed(2)));
        assert!(fixed(3).is_after(&fixed(2)));
    }

    #[test]
    fn hours_since_is_fractional() {
        let start = fixed(10);
        let later = start.plus_minutes(90);
        assert_eq!(later.hours_since(&start), 1.5);
        assert_eq!(start.hours_since(&later), -1.5);
    }

    #[test]
    fn plus_hours_moves_forward_and_back() {
        assert_eq!(fixed(10).plus_hours(2), fixed(12));
        assert_eq!(fixed(10).plus_hours(-3), fixed(7));
    }

    #[test]
    fn date_is_utc_calendar_day() {
        assert_eq!(fixed(23).date(), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }

    #[test]
    fn serializes_as_rfc3339() {
        let json = serde_json::to_string(&fixed(8)).unwrap();
        assert_eq!(json, r#""2026-03-14T08:00:00Z""#);
    }
}
