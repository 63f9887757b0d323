//! Departure times read from the scheduling service's tables.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Timestamp, TripId};
use crate::ports::DepartureSchedule;

use super::map_sqlx;

/// Reads `trips.date + schedules.departure_time`.
///
/// Both columns are zone-less; they are read as UTC.
pub struct PostgresDepartureSchedule {
    pool: PgPool,
}

impl PostgresDepartureSchedule {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartureSchedule for PostgresDepartureSchedule {
    async fn departure_time(&self, trip_id: &TripId) -> Result<Option<Timestamp>, DomainError> {
        let departs_at: Option<NaiveDateTime> = sqlx::query_scalar(
            r#"
            SELECT (t.date + s.departure_time) AS departs_at
            FROM trips t
            JOIN schedules s ON s.id = t.schedule_id
            WHERE t.id = $1
            "#,
        )
        .bind(trip_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to load departure time", e))?;

        Ok(departs_at.map(|dt| Timestamp::from_datetime(dt.and_utc())))
    }
}
