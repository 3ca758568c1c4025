//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Logger → Database → Service → Listener → graceful run
//!
//! Graceful run (graceful.rs):
//!     Spawn run → Shutdown observed → Cancel run → Wait (bounded) → Result
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (shutdown.rs)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then storage, then listener
//! - Shutdown is an injectable token, not a hidden global
//! - Shutdown has a deadline: the run is abandoned, not killed, when it passes

pub mod graceful;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use graceful::{graceful_run, GracefulError, GracefulRunner};
pub use shutdown::Shutdown;
pub use startup::App;
