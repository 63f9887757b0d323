//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresTicketRepository` - Tickets, seat ledger, atomic refunds
//! - `PostgresBoardingRepository` - Boarding gates and marks
//! - `PostgresDepartureSchedule` - Reads departure times from trips/schedules
//!
//! Refunds and gate opening serialize on a per-trip advisory lock: a refund
//! holds it shared, opening the gate holds it exclusive.

mod boarding_repository;
mod departure_schedule;
mod ticket_repository;

pub use boarding_repository::PostgresBoardingRepository;
pub use departure_schedule::PostgresDepartureSchedule;
pub use ticket_repository::PostgresTicketRepository;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode, TripId};

/// Opens a connection pool sized and timed from configuration.
///
/// # Errors
///
/// Returns `DatabaseError` if the database is unreachable.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::database("Failed to connect to PostgreSQL", e))
}

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Migration failed", e))
}

/// Advisory lock key for a trip.
pub(crate) fn trip_lock_key(trip_id: &TripId) -> i64 {
    let (hi, lo) = trip_id.as_uuid().as_u64_pair();
    (hi ^ lo) as i64
}

/// Maps a sqlx failure: pool exhaustion is a timeout, unreadable data is an
/// internal fault, everything else is a (retryable) database error.
pub(crate) fn map_sqlx(context: &str, err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::PoolTimedOut => {
            DomainError::new(ErrorCode::Timeout, format!("{}: {}", context, err))
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => {
            DomainError::new(ErrorCode::InternalError, format!("{}: {}", context, err))
        }
        _ => DomainError::database(context, err),
    }
}

/// A row that does not map back onto the domain.
pub(crate) fn corrupt_row(what: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Invalid {} in database: {}", what, detail),
    )
}
