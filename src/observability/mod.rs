//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (JSON or pretty)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Logging is best effort: a failed init never stops the process
//! - Request IDs are attached by the RPC layer and show up in trace spans

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LoggingError};
