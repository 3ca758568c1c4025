//! Comment service errors.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during comment operations.
#[derive(Debug, Error)]
pub enum CommentError {
    /// The request was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No comment exists with the given id.
    #[error("comment {0} not found")]
    NotFound(Uuid),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Result type for comment operations.
pub type CommentResult<T> = Result<T, CommentError>;
