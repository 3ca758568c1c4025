//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured address (":8083", "127.0.0.1:0", ...)
//!     → listener.rs (resolve, bind)
//!     → Hand off to the RPC server adapter
//! ```
//!
//! # Design Decisions
//! - Binding happens before serving so bind errors are fatal at startup
//! - The bootstrap owns the listener; the coordinator never creates addresses

pub mod listener;

pub use listener::{bind, resolve_addr, ListenerError};
