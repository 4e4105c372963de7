//! Integration tests for notification preferences.
//!
//! Covers lazy creation with defaults, partial updates, and the
//! tolerance of the update DTO to unknown fields.

use sqlx::PgPool;

use novelink_db::models::notification::UpdatePreferences;
use novelink_db::models::user::CreateUser;
use novelink_db::repositories::{NotificationPreferenceRepo, UserRepo};

async fn seed_user(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: "reader".to_string(),
            email: "reader@test.com".to_string(),
            role: None,
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_read_creates_defaults(pool: PgPool) {
    let user_id = seed_user(&pool).await;

    let prefs = NotificationPreferenceRepo::get_or_create(&pool, user_id)
        .await
        .unwrap();

    // In-app defaults on, email defaults off except chapter releases.
    assert!(prefs.follows_in_app);
    assert!(prefs.comments_in_app);
    assert!(!prefs.comments_email);
    assert!(!prefs.likes_email);
    assert!(prefs.chapters_email);
    assert!(prefs.aggregation_enabled);

    // A repeat read returns the same row, not a fresh one.
    let again = NotificationPreferenceRepo::get_or_create(&pool, user_id)
        .await
        .unwrap();
    assert_eq!(again.created_at, prefs.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_leaves_other_fields_alone(pool: PgPool) {
    let user_id = seed_user(&pool).await;

    let patch = UpdatePreferences {
        comments_in_app: Some(false),
        ..Default::default()
    };
    let updated = NotificationPreferenceRepo::update(&pool, user_id, &patch)
        .await
        .unwrap();

    assert!(!updated.comments_in_app);
    assert!(updated.follows_in_app, "untouched field keeps its default");
    assert!(updated.aggregation_enabled);

    // Flip it back; everything else still intact.
    let patch = UpdatePreferences {
        comments_in_app: Some(true),
        likes_email: Some(true),
        ..Default::default()
    };
    let updated = NotificationPreferenceRepo::update(&pool, user_id, &patch)
        .await
        .unwrap();
    assert!(updated.comments_in_app);
    assert!(updated.likes_email);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_prior_read_creates_the_row(pool: PgPool) {
    let user_id = seed_user(&pool).await;

    let patch = UpdatePreferences {
        follows_email: Some(true),
        ..Default::default()
    };
    let updated = NotificationPreferenceRepo::update(&pool, user_id, &patch)
        .await
        .unwrap();

    assert!(updated.follows_email);
    // Unpatched columns land on their defaults.
    assert!(updated.follows_in_app);
    assert!(!updated.ratings_email);
}

#[test]
fn unknown_fields_are_ignored_not_errors() {
    let json = serde_json::json!({
        "comments_in_app": false,
        "push_enabled": true,
        "frequency": "daily"
    });
    let patch: UpdatePreferences =
        serde_json::from_value(json).expect("unknown fields must not fail deserialization");
    assert_eq!(patch.comments_in_app, Some(false));
    assert_eq!(patch.follows_in_app, None);
}
