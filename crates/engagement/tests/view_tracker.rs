//! Integration tests for the view deduplication engine.

use assert_matches::assert_matches;
use sqlx::PgPool;

use novelink_core::viewer::ViewerIdentity;
use novelink_db::models::story::CreateStory;
use novelink_db::models::user::CreateUser;
use novelink_db::repositories::{StoryRepo, UserRepo};
use novelink_engagement::ViewTracker;

async fn seed_story(pool: &PgPool) -> i64 {
    let author = UserRepo::create(
        pool,
        &CreateUser {
            username: "author".to_string(),
            email: "author@test.com".to_string(),
            role: Some("author".to_string()),
        },
    )
    .await
    .unwrap();

    StoryRepo::create(
        pool,
        &CreateStory {
            author_id: author.id,
            title: "The Glass Orchard".to_string(),
            summary: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticated_reader_counts_once_per_window(pool: PgPool) {
    let story_id = seed_story(&pool).await;
    let tracker = ViewTracker::new(pool);
    let reader = ViewerIdentity::User(42);

    let first = tracker.track(story_id, &reader).await.unwrap();
    assert!(first.counted);
    assert_eq!(first.view_count, 1);

    for _ in 0..3 {
        let repeat = tracker.track(story_id, &reader).await.unwrap();
        assert!(!repeat.counted);
        assert_eq!(repeat.view_count, 1);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn distinct_identities_count_independently(pool: PgPool) {
    let story_id = seed_story(&pool).await;
    let tracker = ViewTracker::new(pool);

    let logged_in = ViewerIdentity::User(42);
    let anon_a = ViewerIdentity::from_request(None, Some("10.0.0.1"), Some("Mozilla"));
    let anon_b = ViewerIdentity::from_request(None, Some("10.0.0.2"), Some("Mozilla"));

    assert!(tracker.track(story_id, &logged_in).await.unwrap().counted);
    assert!(tracker.track(story_id, &anon_a).await.unwrap().counted);
    let third = tracker.track(story_id, &anon_b).await.unwrap();
    assert!(third.counted);
    assert_eq!(third.view_count, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unidentifiable_readers_share_one_bucket(pool: PgPool) {
    let story_id = seed_story(&pool).await;
    let tracker = ViewTracker::new(pool);

    let ghost = ViewerIdentity::from_request(None, None, None);
    assert!(tracker.track(story_id, &ghost).await.unwrap().counted);

    // A second unidentifiable request dedups against the shared key
    // rather than failing or inflating the counter.
    let again = tracker.track(story_id, &ghost).await.unwrap();
    assert!(!again.counted);
    assert_eq!(again.view_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_story_is_not_found(pool: PgPool) {
    let tracker = ViewTracker::new(pool);
    let result = tracker.track(999_999, &ViewerIdentity::User(1)).await;
    assert_matches!(
        result,
        Err(novelink_engagement::EngagementError::Core(
            novelink_core::error::CoreError::NotFound { .. }
        ))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_deleted_story_is_not_found(pool: PgPool) {
    let story_id = seed_story(&pool).await;
    StoryRepo::soft_delete(&pool, story_id).await.unwrap();

    let tracker = ViewTracker::new(pool);
    let result = tracker.track(story_id, &ViewerIdentity::User(1)).await;
    assert_matches!(
        result,
        Err(novelink_engagement::EngagementError::Core(
            novelink_core::error::CoreError::NotFound { .. }
        ))
    );
}
