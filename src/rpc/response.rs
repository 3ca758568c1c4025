//! Mapping of comment errors onto RPC responses.
//!
//! Bodies are always `{"error": "..."}`; storage details are logged, not
//! returned to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::comment::CommentError;

impl IntoResponse for CommentError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CommentError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CommentError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            CommentError::Storage(e) => {
                tracing::error!(error = %e, "Comment storage failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal storage error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
