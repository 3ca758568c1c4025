//! End-to-end comment RPCs against a running `comment api`.

use reqwest::StatusCode;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_comment_crud_flow() {
    let app = common::start_app(common::memory_config()).await;
    let client = common::fresh_client(&app.base_url());

    client.health().await.unwrap();

    let first = client.create_comment("video-1", "first!").await.unwrap();
    let second = client.create_comment("video-1", "second").await.unwrap();
    client.create_comment("video-2", "elsewhere").await.unwrap();

    let fetched = client.get_comment(first.id).await.unwrap();
    assert_eq!(fetched, first);

    let listed = client.list_comments("video-1", None, None).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let page = client.list_comments("video-1", Some(1), Some(1)).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, first.id);

    let updated = client.update_comment(first.id, "edited").await.unwrap();
    assert_eq!(updated.content, "edited");
    assert_eq!(updated.created_at, first.created_at);

    client.delete_comment(second.id).await.unwrap();
    let err = client.get_comment(second.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    assert_eq!(client.delete_comments_by_video("video-1").await.unwrap(), 1);
    assert!(client.list_comments("video-1", None, None).await.unwrap().is_empty());
    assert_eq!(client.list_comments("video-2", None, None).await.unwrap().len(), 1);

    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_error_mapping() {
    let app = common::start_app(common::memory_config()).await;
    let client = common::fresh_client(&app.base_url());

    let err = client.create_comment("video-1", "   ").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert!(err.to_string().contains("content must not be empty"));

    let missing = Uuid::new_v4();
    let err = client.update_comment(missing, "hello").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    let err = client.delete_comment(missing).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_video_ids_with_reserved_characters() {
    let app = common::start_app(common::memory_config()).await;
    let client = common::fresh_client(&app.base_url());

    let awkward = "season/1?ep=2#intro";
    client.create_comment(awkward, "routed correctly").await.unwrap();
    client.create_comment("season", "different video").await.unwrap();

    let listed = client.list_comments(awkward, None, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].video_id, awkward);

    assert_eq!(client.delete_comments_by_video(awkward).await.unwrap(), 1);
    assert_eq!(client.list_comments("season", None, None).await.unwrap().len(), 1);

    app.stop().await.unwrap();
}
