//! Notification entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use novelink_core::notification::NotificationCategory;
use novelink_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
///
/// `data` holds the JSON form of
/// [`NotificationData`](novelink_core::notification::NotificationData);
/// title/body/priority are derived from it at read time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub actor_id: Option<DbId>,
    pub aggregation_key: Option<String>,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub is_archived: bool,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `notification_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationPreference {
    pub user_id: DbId,
    pub follows_in_app: bool,
    pub follows_email: bool,
    pub comments_in_app: bool,
    pub comments_email: bool,
    pub ratings_in_app: bool,
    pub ratings_email: bool,
    pub likes_in_app: bool,
    pub likes_email: bool,
    pub chapters_in_app: bool,
    pub chapters_email: bool,
    pub aggregation_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NotificationPreference {
    /// Whether in-app delivery is enabled for a category.
    ///
    /// The system category has no toggle and is always delivered.
    pub fn in_app_enabled(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Follows => self.follows_in_app,
            NotificationCategory::Comments => self.comments_in_app,
            NotificationCategory::Ratings => self.ratings_in_app,
            NotificationCategory::Likes => self.likes_in_app,
            NotificationCategory::Chapters => self.chapters_in_app,
            NotificationCategory::System => true,
        }
    }

    /// Whether email delivery is enabled for a category.
    ///
    /// The system category is never emailed.
    pub fn email_enabled(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Follows => self.follows_email,
            NotificationCategory::Comments => self.comments_email,
            NotificationCategory::Ratings => self.ratings_email,
            NotificationCategory::Likes => self.likes_email,
            NotificationCategory::Chapters => self.chapters_email,
            NotificationCategory::System => false,
        }
    }
}

/// DTO for partially updating notification preferences.
///
/// Only these whitelisted boolean fields are recognized; unknown JSON
/// fields are ignored by deserialization so older and newer clients can
/// send the same endpoint their own field sets.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferences {
    pub follows_in_app: Option<bool>,
    pub follows_email: Option<bool>,
    pub comments_in_app: Option<bool>,
    pub comments_email: Option<bool>,
    pub ratings_in_app: Option<bool>,
    pub ratings_email: Option<bool>,
    pub likes_in_app: Option<bool>,
    pub likes_email: Option<bool>,
    pub chapters_in_app: Option<bool>,
    pub chapters_email: Option<bool>,
    pub aggregation_enabled: Option<bool>,
}
