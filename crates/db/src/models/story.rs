//! Story entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use novelink_core::types::{DbId, Timestamp};

/// A row from the `stories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a story.
#[derive(Debug, Deserialize)]
pub struct CreateStory {
    pub author_id: DbId,
    pub title: String,
    pub summary: Option<String>,
}

/// Outcome of one view-tracking attempt against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordedView {
    /// Whether this request incremented the counter.
    pub counted: bool,
    /// The story's view count after the attempt.
    pub view_count: i64,
}
