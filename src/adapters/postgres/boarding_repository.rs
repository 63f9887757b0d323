//! PostgreSQL implementation of BoardingRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::boarding::{BoardingEvent, BoardingMark, BoardingScan};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, TripId, UserId};
use crate::ports::BoardingRepository;

use super::{corrupt_row, map_sqlx, trip_lock_key};

/// PostgreSQL implementation of the BoardingRepository port.
pub struct PostgresBoardingRepository {
    pool: PgPool,
}

impl PostgresBoardingRepository {
    /// Creates a new PostgresBoardingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BoardingEventRow {
    trip_id: Uuid,
    started_at: DateTime<Utc>,
    started_by: String,
}

impl TryFrom<BoardingEventRow> for BoardingEvent {
    type Error = DomainError;

    fn try_from(row: BoardingEventRow) -> Result<Self, Self::Error> {
        Ok(BoardingEvent {
            trip_id: TripId::from_uuid(row.trip_id),
            started_at: Timestamp::from_datetime(row.started_at),
            started_by: UserId::new(row.started_by).map_err(|e| corrupt_row("started_by", e))?,
        })
    }
}

#[async_trait]
impl BoardingRepository for PostgresBoardingRepository {
    async fn open_gate(&self, gate: &BoardingEvent) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx("Failed to start transaction", e))?;

        // Waits for in-flight refunds on this trip, which hold the lock shared.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(trip_lock_key(&gate.trip_id))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx("Failed to lock trip", e))?;

        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO boarding_events (trip_id, started_at, started_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (trip_id) DO NOTHING
            RETURNING trip_id
            "#,
        )
        .bind(gate.trip_id.as_uuid())
        .bind(gate.started_at.as_datetime())
        .bind(gate.started_by.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx("Failed to open boarding", e))?;

        if inserted.is_none() {
            return Err(DomainError::new(
                ErrorCode::BoardingAlreadyStarted,
                format!("Boarding already started for trip {}", gate.trip_id),
            ));
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx("Failed to commit boarding start", e))?;
        Ok(())
    }

    async fn find_gate(&self, trip_id: &TripId) -> Result<Option<BoardingEvent>, DomainError> {
        sqlx::query_as::<_, BoardingEventRow>(
            "SELECT trip_id, started_at, started_by FROM boarding_events WHERE trip_id = $1",
        )
        .bind(trip_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to load boarding gate", e))?
        .map(BoardingEvent::try_from)
        .transpose()
    }

    async fn mark(&self, scan: BoardingScan) -> Result<BoardingMark, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx("Failed to start transaction", e))?;

        // FOR SHARE blocks a concurrent refund of this ticket until we commit.
        let ticket: Option<(Uuid, String)> =
            sqlx::query_as("SELECT trip_id, status FROM tickets WHERE id = $1 FOR SHARE")
                .bind(scan.ticket_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx("Failed to lock ticket", e))?;

        let (trip_uuid, status) = ticket.ok_or_else(|| {
            DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket {} not found", scan.ticket_id),
            )
            .with_detail("ticket_id", scan.ticket_id.to_string())
        })?;

        if status != "active" {
            return Err(DomainError::new(
                ErrorCode::TicketNotActive,
                format!("Ticket {} is {}", scan.ticket_id, status),
            ));
        }

        let gate_open: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM boarding_events WHERE trip_id = $1)")
                .bind(trip_uuid)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx("Failed to check boarding gate", e))?;
        if !gate_open {
            return Err(DomainError::new(
                ErrorCode::BoardingNotStarted,
                format!("Boarding has not started for trip {}", trip_uuid),
            ));
        }

        let mark = BoardingMark::from_scan(scan, TripId::from_uuid(trip_uuid));
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO boarding_marks (ticket_id, trip_id, marked_at, marked_by, scan_method)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (ticket_id) DO NOTHING
            RETURNING ticket_id
            "#,
        )
        .bind(mark.ticket_id.as_uuid())
        .bind(mark.trip_id.as_uuid())
        .bind(mark.marked_at.as_datetime())
        .bind(mark.marked_by.as_str())
        .bind(mark.scan_method.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx("Failed to record boarding", e))?;

        if inserted.is_none() {
            return Err(DomainError::new(
                ErrorCode::AlreadyMarked,
                format!("Ticket {} already boarded", mark.ticket_id),
            ));
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx("Failed to commit boarding mark", e))?;
        Ok(mark)
    }

    async fn count_marks_by_trip(&self, trip_id: &TripId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boarding_marks WHERE trip_id = $1")
            .bind(trip_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to count boarding marks", e))?;

        Ok(count.max(0) as u64)
    }
}
