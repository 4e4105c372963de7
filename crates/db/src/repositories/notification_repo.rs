//! Repository for the `notifications` table.

use sqlx::PgPool;

use novelink_core::types::DbId;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "\
    id, user_id, kind, actor_id, aggregation_key, data, \
    is_read, read_at, is_archived, archived_at, created_at, updated_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a fresh unread inbox notification.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        kind: &str,
        actor_id: Option<DbId>,
        aggregation_key: Option<&str>,
        data: &serde_json::Value,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, kind, actor_id, aggregation_key, data) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(kind)
            .bind(actor_id)
            .bind(aggregation_key)
            .bind(data)
            .fetch_one(pool)
            .await
    }

    /// Find the live mergeable notification for (`user_id`, `key`): the
    /// newest unread, non-archived row created within the last
    /// `window_secs` seconds.
    pub async fn find_live_aggregable(
        pool: &PgPool,
        user_id: DbId,
        key: &str,
        window_secs: f64,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 AND aggregation_key = $2 \
               AND is_read = FALSE AND is_archived = FALSE \
               AND created_at > NOW() - make_interval(secs => $3) \
             ORDER BY created_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(key)
            .bind(window_secs)
            .fetch_optional(pool)
            .await
    }

    /// Write merged aggregation data back to a live notification.
    ///
    /// Refreshes `updated_at` and leaves `created_at` untouched. Guarded
    /// on the row still being unread and in the inbox; returns `None`
    /// when it was read or archived in the meantime (the caller then
    /// inserts a fresh row instead).
    pub async fn update_merged(
        pool: &PgPool,
        notification_id: DbId,
        actor_id: Option<DbId>,
        data: &serde_json::Value,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET data = $2, actor_id = $3, updated_at = NOW() \
             WHERE id = $1 AND is_read = FALSE AND is_archived = FALSE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .bind(data)
            .bind(actor_id)
            .fetch_optional(pool)
            .await
    }

    /// List a page of notifications for a user, filtered by archive
    /// state, most recent activity first.
    ///
    /// `limit` and `offset` must already be clamped by the caller.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        archived: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 AND is_archived = $2 \
             ORDER BY updated_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(archived)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a notification as read.
    ///
    /// Idempotent: re-marking keeps the original `read_at`. Returns
    /// `None` when the row does not exist or is not owned by `user_id`.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a notification as archived. Archiving is one-directional;
    /// nothing ever clears the flag.
    ///
    /// Idempotent, with the same ownership contract as
    /// [`mark_read`](Self::mark_read).
    pub async fn mark_archived(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_archived = TRUE, archived_at = COALESCE(archived_at, NOW()) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Archive every inbox notification for a user in one batch.
    ///
    /// Returns the number of rows archived (0 on a repeat call).
    pub async fn archive_all(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_archived = TRUE, archived_at = COALESCE(archived_at, NOW()) \
             WHERE user_id = $1 AND is_archived = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread inbox notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND is_read = FALSE AND is_archived = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
