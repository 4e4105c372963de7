//! Repository for the `notification_preferences` table.

use sqlx::PgPool;

use novelink_core::types::DbId;

use crate::models::notification::{NotificationPreference, UpdatePreferences};

/// Column list for `notification_preferences` queries.
const COLUMNS: &str = "\
    user_id, follows_in_app, follows_email, comments_in_app, comments_email, \
    ratings_in_app, ratings_email, likes_in_app, likes_email, \
    chapters_in_app, chapters_email, aggregation_enabled, created_at, updated_at";

/// Provides read-or-create and partial-update operations for
/// notification preferences.
pub struct NotificationPreferenceRepo;

impl NotificationPreferenceRepo {
    /// Get a user's preferences, lazily creating the row with column
    /// defaults on first access.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<NotificationPreference, sqlx::Error> {
        sqlx::query(
            "INSERT INTO notification_preferences (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM notification_preferences WHERE user_id = $1");
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update, creating the row first if needed.
    ///
    /// Uses `COALESCE` so only fields that are `Some` in the patch are
    /// overwritten; the `VALUES` defaults mirror the column defaults.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        patch: &UpdatePreferences,
    ) -> Result<NotificationPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_preferences \
                (user_id, follows_in_app, follows_email, comments_in_app, comments_email, \
                 ratings_in_app, ratings_email, likes_in_app, likes_email, \
                 chapters_in_app, chapters_email, aggregation_enabled) \
             VALUES ($1, COALESCE($2, TRUE), COALESCE($3, FALSE), \
                     COALESCE($4, TRUE), COALESCE($5, FALSE), \
                     COALESCE($6, TRUE), COALESCE($7, FALSE), \
                     COALESCE($8, TRUE), COALESCE($9, FALSE), \
                     COALESCE($10, TRUE), COALESCE($11, TRUE), \
                     COALESCE($12, TRUE)) \
             ON CONFLICT (user_id) DO UPDATE SET \
                follows_in_app = COALESCE($2, notification_preferences.follows_in_app), \
                follows_email = COALESCE($3, notification_preferences.follows_email), \
                comments_in_app = COALESCE($4, notification_preferences.comments_in_app), \
                comments_email = COALESCE($5, notification_preferences.comments_email), \
                ratings_in_app = COALESCE($6, notification_preferences.ratings_in_app), \
                ratings_email = COALESCE($7, notification_preferences.ratings_email), \
                likes_in_app = COALESCE($8, notification_preferences.likes_in_app), \
                likes_email = COALESCE($9, notification_preferences.likes_email), \
                chapters_in_app = COALESCE($10, notification_preferences.chapters_in_app), \
                chapters_email = COALESCE($11, notification_preferences.chapters_email), \
                aggregation_enabled = COALESCE($12, notification_preferences.aggregation_enabled), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .bind(patch.follows_in_app)
            .bind(patch.follows_email)
            .bind(patch.comments_in_app)
            .bind(patch.comments_email)
            .bind(patch.ratings_in_app)
            .bind(patch.ratings_email)
            .bind(patch.likes_in_app)
            .bind(patch.likes_email)
            .bind(patch.chapters_in_app)
            .bind(patch.chapters_email)
            .bind(patch.aggregation_enabled)
            .fetch_one(pool)
            .await
    }
}
