//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (connection counts, timeouts)
//! - Check that addresses and filter directives parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ApiConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::{ApiConfig, StoreBackend};
use crate::net::listener::resolve_addr;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn invalid(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = resolve_addr(&config.server.grpc_addr) {
        errors.push(invalid("server.grpc_addr", e.to_string()));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(invalid("server.request_timeout_secs", "must be greater than zero"));
    }

    if tracing_subscriber::EnvFilter::try_new(&config.logger.level).is_err() {
        errors.push(invalid(
            "logger.level",
            format!("'{}' is not a valid filter directive", config.logger.level),
        ));
    }

    if config.pg.backend == StoreBackend::Postgres && config.pg.url.trim().is_empty() {
        errors.push(invalid("pg.url", "required when backend is postgres"));
    }

    if config.pg.max_connections == 0 {
        errors.push(invalid("pg.max_connections", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(invalid(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
