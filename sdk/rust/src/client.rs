//! Rust client for the comment API.

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub video_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    video_id: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateCommentRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListCommentsResponse {
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
struct DeleteCommentsResponse {
    deleted: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("comment API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid base URL {0:?}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status returned by the API, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            ClientError::InvalidUrl(_) => None,
        }
    }
}

pub struct CommentClient {
    client: Client,
    base_url: String,
}

impl CommentClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL joined with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let resp = self
            .client
            .get(self.endpoint(&["healthz"])?)
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    pub async fn create_comment(&self, video_id: &str, content: &str) -> Result<Comment, ClientError> {
        let resp = self
            .client
            .post(self.endpoint(&["v1", "comments"])?)
            .json(&CreateCommentRequest { video_id, content })
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, ClientError> {
        let resp = self
            .client
            .get(self.endpoint(&["v1", "comments", id.to_string().as_str()])?)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn list_comments(
        &self,
        video_id: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Comment>, ClientError> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }

        let resp = self
            .client
            .get(self.endpoint(&["v1", "videos", video_id, "comments"])?)
            .query(&query)
            .send()
            .await?;
        decode::<ListCommentsResponse>(resp).await.map(|r| r.comments)
    }

    pub async fn update_comment(&self, id: Uuid, content: &str) -> Result<Comment, ClientError> {
        let resp = self
            .client
            .put(self.endpoint(&["v1", "comments", id.to_string().as_str()])?)
            .json(&UpdateCommentRequest { content })
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.endpoint(&["v1", "comments", id.to_string().as_str()])?)
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    /// Delete every comment on a video, returning how many were removed.
    pub async fn delete_comments_by_video(&self, video_id: &str) -> Result<u64, ClientError> {
        let resp = self
            .client
            .delete(self.endpoint(&["v1", "videos", video_id, "comments"])?)
            .send()
            .await?;
        decode::<DeleteCommentsResponse>(resp).await.map(|r| r.deleted)
    }
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await?;
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => text,
    };
    Err(ClientError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    Ok(check(resp).await?.json::<T>().await?)
}
