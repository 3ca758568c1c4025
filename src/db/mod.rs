//! Database collaborator.
//!
//! The bootstrap opens the pool, hands it to the comment DAO and closes it
//! after the RPC server has stopped. Nothing else talks to it directly.

pub mod pg;

pub use pg::{DbError, PgClient};
