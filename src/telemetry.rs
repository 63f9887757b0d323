//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the configured filter when set.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ServiceConfig};

/// Installs the global subscriber: an `EnvFilter` plus a pretty or JSON
/// formatter.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &ServiceConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
    }
}
