//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Open storage and build the comment service
//! - Bind the RPC listener
//! - Hand the server to the graceful coordinator and clean up afterwards
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener is bound last (traffic only when ready)
//! - Cleanup errors are reported alongside run errors, never instead of them

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::comment::{CommentDao, CommentService, InMemoryCommentDao, PgCommentDao};
use crate::config::{validate_config, ApiConfig, ConfigError, StoreBackend};
use crate::db::{DbError, PgClient};
use crate::error::AppError;
use crate::lifecycle::{graceful_run, Shutdown};
use crate::net;
use crate::rpc::{serve_rpc, RpcServer};

/// A fully initialized comment API, ready to serve.
pub struct App {
    config: ApiConfig,
    service: CommentService,
    listener: TcpListener,
    db: Option<PgClient>,
}

impl App {
    /// Open storage and bind the listener described by `config`.
    pub async fn build(config: ApiConfig) -> Result<Self, AppError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let (dao, db) = open_store(&config).await?;
        let service = CommentService::new(dao);

        let listener = match net::bind(&config.server.grpc_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen RPC address");
                return Err(AppError::from(e).with_cleanup(close_store(db).await));
            }
        };

        Ok(Self {
            config,
            service,
            listener,
            db,
        })
    }

    /// Address the RPC listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` fires, then drain, stop and close storage.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), AppError> {
        let server = Arc::new(RpcServer::for_service(self.service, &self.config.server));
        let listener = self.listener;

        let run_result = graceful_run(
            move |stop| serve_rpc(listener, server, stop),
            &self.config.graceful,
            shutdown,
        )
        .await
        .map_err(AppError::from);

        match &run_result {
            Err(e) if e.is_shutdown_timeout() => {
                tracing::error!(error = %e, "Shutdown timed out");
            }
            Err(e) => tracing::error!(error = %e, "Run failed"),
            Ok(()) => {}
        }

        AppError::combine(run_result, close_store(self.db).await)
    }
}

async fn open_store(config: &ApiConfig) -> Result<(Arc<dyn CommentDao>, Option<PgClient>), AppError> {
    match config.pg.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory comment store");
            Ok((Arc::new(InMemoryCommentDao::new()), None))
        }
        StoreBackend::Postgres => {
            let client = PgClient::connect(&config.pg).await?;
            let dao = PgCommentDao::new(client.pool().clone());

            if let Err(e) = dao.ensure_schema().await {
                let schema_err = AppError::from(DbError::Schema(e));
                return Err(schema_err.with_cleanup(close_store(Some(client)).await));
            }

            Ok((Arc::new(dao), Some(client)))
        }
    }
}

async fn close_store(db: Option<PgClient>) -> Result<(), AppError> {
    match db {
        Some(client) => client.close().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to close postgres client");
            AppError::from(e)
        }),
        None => Ok(()),
    }
}
