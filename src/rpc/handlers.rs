//! Comment RPC routes.

use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::comment::{
    Comment, CommentResult, CommentService, CreateCommentRequest, DeleteCommentsResponse,
    ListCommentsQuery, ListCommentsResponse, UpdateCommentRequest,
};
use crate::config::ServerConfig;
use crate::observability::metrics;

/// Build the router serving `service`.
#[allow(deprecated)]
pub fn router(service: CommentService, config: &ServerConfig) -> Router {
    Router::new()
        .route("/v1/comments", post(create_comment))
        .route(
            "/v1/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route(
            "/v1/videos/{video_id}/comments",
            get(list_comments).delete(delete_comments_by_video),
        )
        .route_layer(middleware::from_fn(metrics::track_rpc))
        .route("/healthz", get(healthz))
        .with_state(service)
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_comment(
    State(service): State<CommentService>,
    Json(req): Json<CreateCommentRequest>,
) -> CommentResult<(StatusCode, Json<Comment>)> {
    let comment = service.create_comment(&req.video_id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn get_comment(
    State(service): State<CommentService>,
    Path(id): Path<Uuid>,
) -> CommentResult<Json<Comment>> {
    Ok(Json(service.get_comment(id).await?))
}

async fn update_comment(
    State(service): State<CommentService>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommentRequest>,
) -> CommentResult<Json<Comment>> {
    Ok(Json(service.update_comment(id, &req.content).await?))
}

async fn delete_comment(
    State(service): State<CommentService>,
    Path(id): Path<Uuid>,
) -> CommentResult<StatusCode> {
    service.delete_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_comments(
    State(service): State<CommentService>,
    Path(video_id): Path<String>,
    Query(query): Query<ListCommentsQuery>,
) -> CommentResult<Json<ListCommentsResponse>> {
    let comments = service
        .list_comments(&video_id, query.limit, query.offset)
        .await?;
    Ok(Json(ListCommentsResponse { comments }))
}

async fn delete_comments_by_video(
    State(service): State<CommentService>,
    Path(video_id): Path<String>,
) -> CommentResult<Json<DeleteCommentsResponse>> {
    let deleted = service.delete_comments_by_video(&video_id).await?;
    Ok(Json(DeleteCommentsResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::InMemoryCommentDao;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let service = CommentService::new(Arc::new(InMemoryCommentDao::new()));
        router(service, &ServerConfig::default())
    }

    #[tokio::test]
    async fn create_returns_created_with_request_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/comments")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"video_id":"v1","content":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/v1/comments/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn healthz_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
