//! RPC server adapter.
//!
//! # Responsibilities
//! - Bind the comment router to an already-bound listener
//! - Expose a uniform `serve` / `graceful_stop` contract
//! - Turn an adapter into a cancellable run function for the coordinator
//!
//! # Design Decisions
//! - `graceful_stop` never enforces a deadline; the coordinator does
//! - Stopping closes the listener first, then waits for in-flight requests

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::comment::CommentService;
use crate::config::ServerConfig;
use crate::rpc::handlers;

/// Abnormal termination of a serving adapter.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The accept loop or the listener failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The serving task panicked.
    #[error("serving task failed: {0}")]
    Task(String),
}

impl From<JoinError> for ServeError {
    fn from(e: JoinError) -> Self {
        ServeError::Task(e.to_string())
    }
}

/// A server that can be started on a listener and stopped gracefully.
#[async_trait]
pub trait ServerAdapter: Send + Sync + 'static {
    /// Accept and handle connections until stopped.
    ///
    /// Returns `Ok(())` after an orderly stop.
    async fn serve(&self, listener: TcpListener) -> Result<(), ServeError>;

    /// Stop accepting, let in-flight requests finish, then make `serve` return.
    ///
    /// Does not block and may be called more than once.
    fn graceful_stop(&self);
}

/// Serves the comment router over HTTP.
pub struct RpcServer {
    router: Router,
    stop: CancellationToken,
}

impl RpcServer {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            stop: CancellationToken::new(),
        }
    }

    /// Server exposing `service` with the routes from [`handlers::router`].
    pub fn for_service(service: CommentService, config: &ServerConfig) -> Self {
        Self::new(handlers::router(service, config))
    }
}

#[async_trait]
impl ServerAdapter for RpcServer {
    async fn serve(&self, listener: TcpListener) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "RPC server starting");

        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(self.stop.clone().cancelled_owned())
            .await?;

        tracing::info!(address = %addr, "RPC server stopped");
        Ok(())
    }

    fn graceful_stop(&self) {
        if !self.stop.is_cancelled() {
            tracing::info!("Draining RPC server");
        }
        self.stop.cancel();
    }
}

/// Serve `server` on `listener` until `stop` is cancelled.
///
/// Matches the shape the graceful coordinator expects: once `stop` fires the
/// server is stopped gracefully and this returns when the drain is done. If
/// the server exits on its own first, its result is returned immediately.
pub async fn serve_rpc<S: ServerAdapter>(
    listener: TcpListener,
    server: Arc<S>,
    stop: CancellationToken,
) -> Result<(), ServeError> {
    let serving = server.clone();
    let mut serve = tokio::spawn(async move { serving.serve(listener).await });

    tokio::select! {
        biased;
        joined = &mut serve => {
            let result = joined.map_err(ServeError::from).and_then(|res| res);
            if let Err(e) = &result {
                tracing::error!(error = %e, "Failed to run RPC server");
            }
            return result;
        }
        _ = stop.cancelled() => {}
    }

    server.graceful_stop();
    serve.await?
}
