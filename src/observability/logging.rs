//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - JSON output for production, pretty output for development
//! - Log level from config, overridable through `RUST_LOG`

use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

use crate::config::LoggerConfig;

/// Errors from logger initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber described by `config`.
///
/// Fails if a subscriber is already installed; callers may treat that as
/// non-fatal.
pub fn init_logging(config: &LoggerConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.development {
        registry.with(tracing_subscriber::fmt::layer().pretty()).try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init()?;
    }

    Ok(())
}
