//! Ticket core service binary.
//!
//! Loads configuration, connects PostgreSQL and Redis, and keeps the
//! `TicketService` alive until Ctrl-C. Transports embed the service through
//! the library crate.

use std::sync::Arc;

use ticket_core::adapters::postgres::{
    self, PostgresBoardingRepository, PostgresDepartureSchedule, PostgresTicketRepository,
};
use ticket_core::adapters::RedisEventPublisher;
use ticket_core::application::{ServiceDeps, TicketService};
use ticket_core::config::AppConfig;
use ticket_core::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init_tracing(&config.service)?;

    tracing::info!(
        environment = ?config.service.environment,
        database = %config.database.redacted_url(),
        "Starting ticket core"
    );

    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        if config.is_production() {
            tracing::warn!("Applying migrations against a production database");
        }
        postgres::migrate(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let events = RedisEventPublisher::connect(&config.redis).await?;

    let deps = ServiceDeps {
        tickets: Arc::new(PostgresTicketRepository::new(pool.clone())),
        boarding: Arc::new(PostgresBoardingRepository::new(pool.clone())),
        schedule: Arc::new(PostgresDepartureSchedule::new(pool.clone())),
        events: Arc::new(events),
    };
    let settings = config.service_settings();
    let _service = TicketService::new(deps, settings);

    tracing::info!(
        operation_timeout = ?settings.operation_timeout,
        fallback_hours = settings.policy.fallback_hours,
        "Ticket core ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    pool.close().await;

    Ok(())
}
