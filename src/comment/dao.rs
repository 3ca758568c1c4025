//! Comment persistence.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::PgPool;
use uuid::Uuid;

use crate::comment::error::CommentResult;
use crate::comment::model::Comment;

/// Storage seam for comments.
#[async_trait]
pub trait CommentDao: Send + Sync {
    async fn create(&self, comment: &Comment) -> CommentResult<()>;
    async fn get(&self, id: Uuid) -> CommentResult<Option<Comment>>;
    /// Comments on a video, newest first.
    async fn list_by_video(&self, video_id: &str, limit: u32, offset: u32) -> CommentResult<Vec<Comment>>;
    async fn update_content(
        &self,
        id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> CommentResult<Option<Comment>>;
    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> CommentResult<bool>;
    async fn delete_by_video(&self, video_id: &str) -> CommentResult<u64>;
}

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    id UUID PRIMARY KEY,
    video_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS comments_video_id_created_at_idx ON comments (video_id, created_at DESC)";

/// PostgreSQL-backed comment storage.
#[derive(Clone)]
pub struct PgCommentDao {
    pool: PgPool,
}

impl PgCommentDao {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `comments` table and its index if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CommentDao for PgCommentDao {
    async fn create(&self, comment: &Comment) -> CommentResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, video_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.video_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> CommentResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, video_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_by_video(&self, video_id: &str, limit: u32, offset: u32) -> CommentResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, video_id, content, created_at, updated_at
            FROM comments
            WHERE video_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(video_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> CommentResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, video_id, content, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(updated_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> CommentResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_video(&self, video_id: &str) -> CommentResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE video_id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Process-local comment storage.
///
/// Each entry carries its insertion sequence so listings stay newest-first
/// even when two comments share a timestamp.
#[derive(Debug, Default)]
pub struct InMemoryCommentDao {
    comments: DashMap<Uuid, (u64, Comment)>,
    next_seq: AtomicU64,
}

impl InMemoryCommentDao {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[async_trait]
impl CommentDao for InMemoryCommentDao {
    async fn create(&self, comment: &Comment) -> CommentResult<()> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.comments.insert(comment.id, (seq, comment.clone()));
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CommentResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|entry| entry.value().1.clone()))
    }

    async fn list_by_video(&self, video_id: &str, limit: u32, offset: u32) -> CommentResult<Vec<Comment>> {
        let mut matching: Vec<(u64, Comment)> = self
            .comments
            .iter()
            .filter(|entry| entry.value().1.video_id == video_id)
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(_, comment)| comment)
            .collect())
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> CommentResult<Option<Comment>> {
        Ok(self.comments.get_mut(&id).map(|mut entry| {
            let comment = &mut entry.value_mut().1;
            comment.content = content.to_string();
            comment.updated_at = updated_at;
            comment.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> CommentResult<bool> {
        Ok(self.comments.remove(&id).is_some())
    }

    async fn delete_by_video(&self, video_id: &str) -> CommentResult<u64> {
        let mut removed = 0u64;
        self.comments.retain(|_, (_, comment)| {
            if comment.video_id == video_id {
                removed += 1;
                false
            } else {
                true
            }
        });
        Ok(removed)
    }
}
