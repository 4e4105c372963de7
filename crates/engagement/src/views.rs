//! View deduplication engine.
//!
//! Decides, for each inbound story read, whether to increment the
//! story's view counter, filtering refresh spam and rapid repeat visits
//! from the same viewer key.

use novelink_core::error::CoreError;
use novelink_core::types::DbId;
use novelink_core::viewer::ViewerIdentity;
use novelink_db::models::story::RecordedView;
use novelink_db::repositories::{StoryRepo, ViewRepo};
use novelink_db::retry::with_retry;
use novelink_db::DbPool;

use crate::error::EngagementError;

/// The dedup window: repeat views from one viewer key within this span
/// are not re-counted. Long enough to absorb refresh bursts, short
/// enough not to materially under-count genuinely distinct reads.
pub const VIEW_DEDUP_WINDOW_SECS: f64 = 30.0 * 60.0;

/// Tracks story views with per-viewer deduplication.
pub struct ViewTracker {
    pool: DbPool,
}

impl ViewTracker {
    /// Create a tracker over the given database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record one read of `story_id` by `viewer`.
    ///
    /// Fails with `NotFound` when the story does not exist or is
    /// soft-deleted. Otherwise the claim/increment pair runs atomically
    /// in the store: at most one count per viewer per window, and the
    /// counter never decreases. Identity resolution itself never fails --
    /// an unidentifiable viewer lands in the shared fail-soft key.
    pub async fn track(
        &self,
        story_id: DbId,
        viewer: &ViewerIdentity,
    ) -> Result<RecordedView, EngagementError> {
        let pool = &self.pool;

        with_retry("stories.find_active", || {
            StoryRepo::find_active(pool, story_id)
        })
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Story",
            id: story_id,
        })?;

        let viewer_key = viewer.viewer_key();
        let recorded = with_retry("views.record", || {
            ViewRepo::record_view(pool, story_id, &viewer_key, VIEW_DEDUP_WINDOW_SECS)
        })
        .await?;

        if recorded.counted {
            tracing::debug!(
                story_id,
                viewer_key = %viewer_key,
                view_count = recorded.view_count,
                "View counted"
            );
        }

        Ok(recorded)
    }
}
