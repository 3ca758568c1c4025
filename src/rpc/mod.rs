//! RPC endpoint subsystem.
//!
//! # Data Flow
//! ```text
//! Bound TcpListener
//!     → server.rs (RpcServer: serve / graceful_stop)
//!     → handlers.rs (routes, request id, tracing, timeout, metrics)
//!     → CommentService
//!     → response.rs (CommentError → status + JSON body)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use handlers::router;
pub use server::{serve_rpc, RpcServer, ServeError, ServerAdapter};
