//! Comment business logic.
//!
//! # Data Flow
//! ```text
//! RPC handler
//!     → service.rs (validation, defaults)
//!     → dao.rs (CommentDao: PostgreSQL or in-memory)
//! ```
//!
//! # Design Decisions
//! - Storage sits behind a trait object so the bootstrap picks the backend
//! - Validation happens once, in the service, never in the DAOs

pub mod dao;
pub mod error;
pub mod model;
pub mod service;

pub use dao::{CommentDao, InMemoryCommentDao, PgCommentDao};
pub use error::{CommentError, CommentResult};
pub use model::{
    Comment, CreateCommentRequest, DeleteCommentsResponse, ListCommentsQuery,
    ListCommentsResponse, UpdateCommentRequest,
};
pub use service::CommentService;
