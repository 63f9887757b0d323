//! PostgreSQL implementation of TicketRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, Money, SeatId, TicketId, Timestamp, TripId,
};
use crate::domain::refund::RefundQuote;
use crate::domain::stats::SalesStats;
use crate::domain::ticket::{Passenger, RefundDetails, Ticket, TicketStatus};
use crate::ports::TicketRepository;

use super::{corrupt_row, map_sqlx, trip_lock_key};

const TICKET_COLUMNS: &str = r#"
    id, trip_id, seat_id,
    passenger_name, passenger_document, passenger_phone, passenger_email,
    price, status, payment_method, qr_code, bar_code,
    refunded_at, refund_amount, refund_penalty,
    created_at, updated_at
"#;

/// PostgreSQL implementation of the TicketRepository port.
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Creates a new PostgresTicketRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_code(&self, column: &str, code: &str) -> Result<Option<Ticket>, DomainError> {
        let sql = format!("SELECT {} FROM tickets WHERE {} = $1", TICKET_COLUMNS, column);
        sqlx::query_as::<_, TicketRow>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to load ticket", e))?
            .map(Ticket::try_from)
            .transpose()
    }
}

/// Database row representation of a ticket.
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    trip_id: Uuid,
    seat_id: Option<String>,
    passenger_name: Option<String>,
    passenger_document: Option<String>,
    passenger_phone: Option<String>,
    passenger_email: Option<String>,
    price: i64,
    status: String,
    payment_method: String,
    qr_code: String,
    bar_code: String,
    refunded_at: Option<DateTime<Utc>>,
    refund_amount: Option<i64>,
    refund_penalty: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = DomainError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status: TicketStatus = row.status.parse().map_err(|e| corrupt_row("status", e))?;
        let payment_method = row
            .payment_method
            .parse()
            .map_err(|e| corrupt_row("payment_method", e))?;
        let seat_id = row
            .seat_id
            .map(SeatId::new)
            .transpose()
            .map_err(|e| corrupt_row("seat_id", e))?;

        let refund = match (row.refunded_at, row.refund_amount, row.refund_penalty) {
            (Some(at), Some(amount), Some(penalty)) => Some(RefundDetails {
                refunded_at: Timestamp::from_datetime(at),
                refund_amount: Money::from_minor(amount),
                refund_penalty: Money::from_minor(penalty),
            }),
            (None, None, None) => None,
            _ => return Err(corrupt_row("refund columns", row.id)),
        };

        Ok(Ticket {
            id: TicketId::from_uuid(row.id),
            trip_id: TripId::from_uuid(row.trip_id),
            seat_id,
            passenger: Passenger {
                name: row.passenger_name,
                document: row.passenger_document,
                phone: row.passenger_phone,
                email: row.passenger_email,
            },
            price: Money::from_minor(row.price),
            status,
            payment_method,
            qr_code: row.qr_code,
            bar_code: row.bar_code,
            refund,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn not_found(id: &TicketId) -> DomainError {
    DomainError::new(ErrorCode::TicketNotFound, format!("Ticket {} not found", id))
        .with_detail("ticket_id", id.to_string())
}

fn map_insert_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("tickets_active_seat_key") => {
                return DomainError::new(ErrorCode::SeatTaken, "Seat is already taken");
            }
            Some("tickets_qr_code_key") | Some("tickets_bar_code_key") => {
                return DomainError::new(ErrorCode::CodeCollision, "Ticket code already issued");
            }
            _ => {}
        }
    }
    map_sqlx("Failed to insert ticket", e)
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, trip_id, seat_id,
                passenger_name, passenger_document, passenger_phone, passenger_email,
                price, status, payment_method, qr_code, bar_code,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(ticket.trip_id.as_uuid())
        .bind(ticket.seat_id.as_ref().map(|s| s.as_str()))
        .bind(&ticket.passenger.name)
        .bind(&ticket.passenger.document)
        .bind(&ticket.passenger.phone)
        .bind(&ticket.passenger.email)
        .bind(ticket.price.minor())
        .bind(ticket.status.as_str())
        .bind(ticket.payment_method.as_str())
        .bind(&ticket.qr_code)
        .bind(&ticket.bar_code)
        .bind(ticket.created_at.as_datetime())
        .bind(ticket.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
        let sql = format!("SELECT {} FROM tickets WHERE id = $1", TICKET_COLUMNS);
        sqlx::query_as::<_, TicketRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to load ticket", e))?
            .map(Ticket::try_from)
            .transpose()
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> Result<Option<Ticket>, DomainError> {
        self.find_by_code("qr_code", qr_code).await
    }

    async fn find_by_bar_code(&self, bar_code: &str) -> Result<Option<Ticket>, DomainError> {
        self.find_by_code("bar_code", bar_code).await
    }

    async fn list_by_trip(&self, trip_id: &TripId) -> Result<Vec<Ticket>, DomainError> {
        let sql = format!(
            "SELECT {} FROM tickets WHERE trip_id = $1 ORDER BY created_at, id",
            TICKET_COLUMNS
        );
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(trip_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to list tickets", e))?;

        rows.into_iter().map(Ticket::try_from).collect()
    }

    async fn count_by_trip(&self, trip_id: &TripId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tickets WHERE trip_id = $1",
        )
        .bind(trip_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to count tickets", e))?;

        Ok(count.max(0) as u64)
    }

    async fn apply_refund(
        &self,
        id: &TicketId,
        quote: &RefundQuote,
        at: Timestamp,
    ) -> Result<Ticket, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx("Failed to start transaction", e))?;

        // trip_id never changes, so it is safe to read before locking.
        let trip_id: Option<Uuid> = sqlx::query_scalar("SELECT trip_id FROM tickets WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx("Failed to load ticket", e))?;
        let trip_id = TripId::from_uuid(trip_id.ok_or_else(|| not_found(id))?);

        sqlx::query("SELECT pg_advisory_xact_lock_shared($1)")
            .bind(trip_lock_key(&trip_id))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx("Failed to lock trip", e))?;

        let sql = format!("SELECT {} FROM tickets WHERE id = $1 FOR UPDATE", TICKET_COLUMNS);
        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx("Failed to lock ticket", e))?
            .ok_or_else(|| not_found(id))?;
        let mut ticket = Ticket::try_from(row)?;

        if !ticket.is_active() {
            return Err(DomainError::new(
                ErrorCode::TicketNotActive,
                format!("Ticket {} is already returned", id),
            ));
        }

        let gate_open: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM boarding_events WHERE trip_id = $1)")
                .bind(trip_id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx("Failed to check boarding gate", e))?;
        if gate_open {
            return Err(DomainError::new(
                ErrorCode::BoardingAlreadyStarted,
                format!("Boarding has started for trip {}", trip_id),
            ));
        }

        ticket
            .refund(quote, at)
            .map_err(|e| DomainError::new(ErrorCode::TicketNotActive, e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE tickets SET
                status = $2,
                refunded_at = $3,
                refund_amount = $4,
                refund_penalty = $5,
                updated_at = $6
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(id.as_uuid())
        .bind(ticket.status.as_str())
        .bind(at.as_datetime())
        .bind(quote.refund_amount.minor())
        .bind(quote.penalty.minor())
        .bind(ticket.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx("Failed to update ticket", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx("Failed to commit refund", e))?;

        Ok(ticket)
    }

    async fn sales_stats(&self, date: NaiveDate) -> Result<SalesStats, DomainError> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DomainError::validation("date", "invalid date"))?
            .and_utc();
        let end = start + chrono::Duration::days(1);

        let (sold, returned, revenue): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'returned'),
                COALESCE(SUM(
                    CASE WHEN status = 'active' THEN price
                         ELSE COALESCE(refund_penalty, 0)
                    END
                ), 0)::BIGINT
            FROM tickets
            WHERE created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to aggregate sales", e))?;

        Ok(SalesStats {
            date,
            tickets_sold: sold.max(0) as u64,
            tickets_returned: returned.max(0) as u64,
            revenue: Money::from_minor(revenue),
        })
    }
}
