//! Comment service library.
//!
//! # Architecture Overview
//!
//! ```text
//!   comment api
//!       │
//!       ▼
//!   ┌────────┐   ┌──────────┐   ┌───────────┐   ┌──────────────┐
//!   │  cli   │──▶│  config  │──▶│ lifecycle │──▶│  net (bind)  │
//!   └────────┘   └──────────┘   │  startup  │   └──────┬───────┘
//!                               └─────┬─────┘          │
//!                                     ▼                ▼
//!                          ┌─────────────────┐   ┌──────────────┐
//!                          │ graceful runner │──▶│  rpc server  │──▶ comment service ──▶ dao ──▶ db
//!                          └────────┬────────┘   └──────────────┘
//!                                   ▲
//!                          Shutdown (signals / tests)
//! ```

pub mod cli;
pub mod comment;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod rpc;

pub use config::ApiConfig;
pub use error::AppError;
pub use lifecycle::{graceful_run, App, GracefulError, GracefulRunner, Shutdown};
pub use rpc::{RpcServer, ServerAdapter};
