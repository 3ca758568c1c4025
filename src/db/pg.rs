//! PostgreSQL connection pool lifecycle.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

use crate::config::PgConfig;

/// Errors from opening, preparing or closing the database.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to postgres: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to prepare comment schema: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("postgres pool did not close within {0:?}")]
    CloseTimeout(Duration),
}

/// Owns the connection pool shared by the comment DAO.
pub struct PgClient {
    pool: PgPool,
    close_timeout: Duration,
}

impl PgClient {
    /// Open a pool and verify one connection can be established.
    pub async fn connect(config: &PgConfig) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(DbError::Connect)?;

        tracing::info!(max_connections = config.max_connections, "Connected to postgres");

        Ok(Self {
            pool,
            close_timeout: Duration::from_secs(config.close_timeout_secs),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to come back.
    ///
    /// Fails if connections are still held once the close timeout passes,
    /// which happens when an abandoned request keeps one open.
    pub async fn close(self) -> Result<(), DbError> {
        match tokio::time::timeout(self.close_timeout, self.pool.close()).await {
            Ok(()) => {
                tracing::info!("Postgres pool closed");
                Ok(())
            }
            Err(_) => Err(DbError::CloseTimeout(self.close_timeout)),
        }
    }
}
