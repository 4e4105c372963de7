//! Repository for the `stories` table.

use sqlx::PgPool;

use novelink_core::types::DbId;

use crate::models::story::{CreateStory, Story};

/// Column list for `stories` queries.
const COLUMNS: &str = "id, author_id, title, summary, is_deleted, created_at, updated_at";

/// Provides CRUD operations for stories.
pub struct StoryRepo;

impl StoryRepo {
    /// Create a story and seed its view counter at 0 in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateStory) -> Result<Story, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO stories (author_id, title, summary) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let story = sqlx::query_as::<_, Story>(&query)
            .bind(input.author_id)
            .bind(&input.title)
            .bind(&input.summary)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO story_view_counters (story_id, count) VALUES ($1, 0)")
            .bind(story.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(story)
    }

    /// Fetch a story by id, excluding soft-deleted ones.
    pub async fn find_active(pool: &PgPool, story_id: DbId) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Story>(&query)
            .bind(story_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a story.
    ///
    /// Returns `true` if the story existed and was not already deleted.
    pub async fn soft_delete(pool: &PgPool, story_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stories \
             SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(story_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
