//! Repository for the view-accounting tables.
//!
//! `story_view_counters` holds the per-story monotonic counter;
//! `story_recent_viewers` holds the short-lived dedup markers. The two
//! are only ever mutated together, inside [`ViewRepo::record_view`].

use sqlx::PgPool;

use novelink_core::types::DbId;

use crate::models::story::RecordedView;

/// Provides the atomic view-counting operations.
pub struct ViewRepo;

impl ViewRepo {
    /// Record one view attempt for (`story_id`, `viewer_key`).
    ///
    /// Runs as a single transaction:
    ///
    /// 1. Conditionally claim the dedup slot: insert the marker row, or
    ///    refresh it in place when the existing one has expired. The
    ///    unique (`story_id`, `viewer_key`) constraint serializes
    ///    concurrent requests from the same viewer, so the counter can
    ///    never be double-incremented within one window.
    /// 2. If the slot was claimed, upsert-increment the counter;
    ///    otherwise read the current value without mutating anything.
    ///
    /// `window_secs` is the dedup window; callers pass the engine's
    /// fixed constant (tests use short windows to exercise expiry).
    pub async fn record_view(
        pool: &PgPool,
        story_id: DbId,
        viewer_key: &str,
        window_secs: f64,
    ) -> Result<RecordedView, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query(
            "INSERT INTO story_recent_viewers (story_id, viewer_key, expires_at) \
             VALUES ($1, $2, NOW() + make_interval(secs => $3)) \
             ON CONFLICT (story_id, viewer_key) DO UPDATE \
                 SET expires_at = EXCLUDED.expires_at \
                 WHERE story_recent_viewers.expires_at <= NOW()",
        )
        .bind(story_id)
        .bind(viewer_key)
        .bind(window_secs)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let view_count: i64 = if claimed {
            sqlx::query_scalar(
                "INSERT INTO story_view_counters (story_id, count) \
                 VALUES ($1, 1) \
                 ON CONFLICT (story_id) DO UPDATE \
                     SET count = story_view_counters.count + 1 \
                 RETURNING count",
            )
            .bind(story_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_scalar("SELECT count FROM story_view_counters WHERE story_id = $1")
                .bind(story_id)
                .fetch_optional(&mut *tx)
                .await?
                .unwrap_or(0)
        };

        tx.commit().await?;

        Ok(RecordedView {
            counted: claimed,
            view_count,
        })
    }

    /// Read a story's current view count.
    pub async fn view_count(pool: &PgPool, story_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT count FROM story_view_counters WHERE story_id = $1")
                .bind(story_id)
                .fetch_optional(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
