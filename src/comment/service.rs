//! Comment service: validation and defaults on top of a [`CommentDao`].

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::comment::dao::CommentDao;
use crate::comment::error::{CommentError, CommentResult};
use crate::comment::model::Comment;

/// Longest accepted comment, in characters.
pub const MAX_CONTENT_CHARS: usize = 1000;
/// Page size used when a listing does not ask for one.
pub const DEFAULT_LIST_LIMIT: u32 = 10;
/// Largest page a listing may return.
pub const MAX_LIST_LIMIT: u32 = 100;

/// CRUD operations on comments.
#[derive(Clone)]
pub struct CommentService {
    dao: Arc<dyn CommentDao>,
}

impl CommentService {
    pub fn new(dao: Arc<dyn CommentDao>) -> Self {
        Self { dao }
    }

    pub async fn create_comment(&self, video_id: &str, content: &str) -> CommentResult<Comment> {
        let video_id = validate_video_id(video_id)?;
        let content = validate_content(content)?;

        let comment = Comment::new(video_id, content);
        self.dao.create(&comment).await?;

        tracing::debug!(comment_id = %comment.id, video_id = %comment.video_id, "Comment created");
        Ok(comment)
    }

    pub async fn get_comment(&self, id: Uuid) -> CommentResult<Comment> {
        self.dao.get(id).await?.ok_or(CommentError::NotFound(id))
    }

    pub async fn list_comments(
        &self,
        video_id: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> CommentResult<Vec<Comment>> {
        let video_id = validate_video_id(video_id)?;
        let limit = match limit {
            None | Some(0) => DEFAULT_LIST_LIMIT,
            Some(n) => n.min(MAX_LIST_LIMIT),
        };

        self.dao
            .list_by_video(video_id, limit, offset.unwrap_or(0))
            .await
    }

    pub async fn update_comment(&self, id: Uuid, content: &str) -> CommentResult<Comment> {
        let content = validate_content(content)?;

        self.dao
            .update_content(id, content, Utc::now())
            .await?
            .ok_or(CommentError::NotFound(id))
    }

    pub async fn delete_comment(&self, id: Uuid) -> CommentResult<()> {
        if self.dao.delete(id).await? {
            tracing::debug!(comment_id = %id, "Comment deleted");
            Ok(())
        } else {
            Err(CommentError::NotFound(id))
        }
    }

    /// Delete every comment on a video, returning how many were removed.
    pub async fn delete_comments_by_video(&self, video_id: &str) -> CommentResult<u64> {
        let video_id = validate_video_id(video_id)?;
        let deleted = self.dao.delete_by_video(video_id).await?;

        tracing::debug!(video_id = %video_id, deleted, "Video comments deleted");
        Ok(deleted)
    }
}

fn validate_video_id(video_id: &str) -> CommentResult<&str> {
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return Err(CommentError::InvalidArgument("video_id must not be empty".into()));
    }
    Ok(video_id)
}

fn validate_content(content: &str) -> CommentResult<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(CommentError::InvalidArgument("content must not be empty".into()));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(CommentError::InvalidArgument(format!(
            "content must be at most {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(content)
}
