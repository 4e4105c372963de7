//! Notification domain model.
//!
//! Defines the closed set of notification kinds, their category and
//! priority mapping, the typed event payload stored in the
//! `notifications.data` column, aggregation-key derivation, and the
//! deterministic title/body rendering used by the API layer.
//!
//! The payload is a tagged enum rather than free-form JSON so the
//! aggregation/merge logic is exhaustively type-checked per kind.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Kind / category / priority
// ---------------------------------------------------------------------------

/// The closed set of notification kinds.
///
/// Serialized in snake_case; the same strings are stored in the
/// `notifications.kind` column and used as the tag of
/// [`NotificationEvent`] payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewFollower,
    NewComment,
    CommentReply,
    NewRating,
    RatingReply,
    Like,
    NewChapter,
    SystemAnnouncement,
    LevelUp,
}

impl NotificationKind {
    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewFollower => "new_follower",
            Self::NewComment => "new_comment",
            Self::CommentReply => "comment_reply",
            Self::NewRating => "new_rating",
            Self::RatingReply => "rating_reply",
            Self::Like => "like",
            Self::NewChapter => "new_chapter",
            Self::SystemAnnouncement => "system_announcement",
            Self::LevelUp => "level_up",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown kinds.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new_follower" => Some(Self::NewFollower),
            "new_comment" => Some(Self::NewComment),
            "comment_reply" => Some(Self::CommentReply),
            "new_rating" => Some(Self::NewRating),
            "rating_reply" => Some(Self::RatingReply),
            "like" => Some(Self::Like),
            "new_chapter" => Some(Self::NewChapter),
            "system_announcement" => Some(Self::SystemAnnouncement),
            "level_up" => Some(Self::LevelUp),
            _ => None,
        }
    }

    /// The preference category this kind is gated by.
    pub fn category(&self) -> NotificationCategory {
        match self {
            Self::NewFollower => NotificationCategory::Follows,
            Self::NewComment | Self::CommentReply => NotificationCategory::Comments,
            Self::NewRating | Self::RatingReply => NotificationCategory::Ratings,
            Self::Like => NotificationCategory::Likes,
            Self::NewChapter => NotificationCategory::Chapters,
            Self::SystemAnnouncement | Self::LevelUp => NotificationCategory::System,
        }
    }

    /// Display/sort priority. Never affects delivery.
    pub fn priority(&self) -> NotificationPriority {
        match self {
            Self::SystemAnnouncement => NotificationPriority::High,
            Self::Like | Self::LevelUp => NotificationPriority::Low,
            _ => NotificationPriority::Normal,
        }
    }

    /// Whether repeated events of this kind merge into one notification.
    pub fn is_aggregable(&self) -> bool {
        matches!(
            self,
            Self::NewFollower | Self::NewComment | Self::NewRating | Self::Like
        )
    }
}

/// Preference categories. Each category has an in-app and an email toggle,
/// except [`System`](NotificationCategory::System), which has neither:
/// system kinds are always delivered in-app and never emailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Follows,
    Comments,
    Ratings,
    Likes,
    Chapters,
    System,
}

impl NotificationCategory {
    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follows => "follows",
            Self::Comments => "comments",
            Self::Ratings => "ratings",
            Self::Likes => "likes",
            Self::Chapters => "chapters",
            Self::System => "system",
        }
    }
}

/// Display weighting for notification lists. Not a delivery guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
}

impl NotificationPriority {
    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

// ---------------------------------------------------------------------------
// Event payload
// ---------------------------------------------------------------------------

/// The typed payload of one domain event, one variant per
/// [`NotificationKind`].
///
/// Serialized internally-tagged on `"kind"` so the stored JSON is
/// self-describing and matches the row's `kind` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    NewFollower,
    NewComment {
        story_id: DbId,
        story_title: String,
        comment_id: DbId,
    },
    CommentReply {
        story_id: DbId,
        story_title: String,
        comment_id: DbId,
        reply_id: DbId,
    },
    NewRating {
        story_id: DbId,
        story_title: String,
        score: i16,
    },
    RatingReply {
        story_id: DbId,
        story_title: String,
        rating_id: DbId,
        reply_id: DbId,
    },
    Like {
        story_id: DbId,
        story_title: String,
        comment_id: DbId,
    },
    NewChapter {
        story_id: DbId,
        story_title: String,
        chapter_id: DbId,
        chapter_title: String,
    },
    SystemAnnouncement {
        title: String,
        message: String,
    },
    LevelUp {
        level: i32,
    },
}

impl NotificationEvent {
    /// The kind of this event.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::NewFollower => NotificationKind::NewFollower,
            Self::NewComment { .. } => NotificationKind::NewComment,
            Self::CommentReply { .. } => NotificationKind::CommentReply,
            Self::NewRating { .. } => NotificationKind::NewRating,
            Self::RatingReply { .. } => NotificationKind::RatingReply,
            Self::Like { .. } => NotificationKind::Like,
            Self::NewChapter { .. } => NotificationKind::NewChapter,
            Self::SystemAnnouncement { .. } => NotificationKind::SystemAnnouncement,
            Self::LevelUp { .. } => NotificationKind::LevelUp,
        }
    }

    /// Derive the aggregation key grouping repeatable events of this kind
    /// on the same target. `None` for non-aggregable kinds.
    ///
    /// The key is scoped per recipient by the store (rows are always
    /// looked up by (`user_id`, `aggregation_key`)), so `new_follower`
    /// needs no target suffix.
    pub fn aggregation_key(&self) -> Option<String> {
        match self {
            Self::NewFollower => Some("new_follower".to_string()),
            Self::NewComment { story_id, .. } => Some(format!("new_comment:story:{story_id}")),
            Self::NewRating { story_id, .. } => Some(format!("new_rating:story:{story_id}")),
            Self::Like { comment_id, .. } => Some(format!("like:comment:{comment_id}")),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Stored data (payload + aggregation bookkeeping)
// ---------------------------------------------------------------------------

/// Upper bound on the per-notification `recent_actor_ids` list.
pub const MAX_RECENT_ACTORS: usize = 5;

/// The full content of a notification's `data` column: the latest event
/// payload plus the aggregation bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    /// The most recent merged event. Flattened, so the stored JSON is
    /// `{"kind": ..., <event fields>, "actor_count": ..., ...}`.
    #[serde(flatten)]
    pub event: NotificationEvent,
    /// Total number of merged events (1 for a fresh notification).
    pub actor_count: i64,
    /// Actor ids of the most recent events, newest first, deduplicated,
    /// capped at [`MAX_RECENT_ACTORS`]. Empty for system events.
    #[serde(default)]
    pub recent_actor_ids: Vec<DbId>,
}

impl NotificationData {
    /// Data for a freshly created notification.
    pub fn new(event: NotificationEvent, actor_id: Option<DbId>) -> Self {
        Self {
            event,
            actor_count: 1,
            recent_actor_ids: actor_id.into_iter().collect(),
        }
    }

    /// Merge a further event into this notification.
    ///
    /// Adopts the newest event's fields (so links target the latest
    /// comment/rating), bumps `actor_count`, and moves the actor to the
    /// front of the bounded recent list.
    pub fn merge(&mut self, event: NotificationEvent, actor_id: Option<DbId>) {
        self.event = event;
        self.actor_count += 1;
        if let Some(actor) = actor_id {
            self.recent_actor_ids.retain(|id| *id != actor);
            self.recent_actor_ids.insert(0, actor);
            self.recent_actor_ids.truncate(MAX_RECENT_ACTORS);
        }
    }

    /// Deterministic notification title.
    ///
    /// Aggregated notifications switch to the "N people did X" form once
    /// `actor_count > 1`.
    pub fn title(&self) -> String {
        let n = self.actor_count;
        match &self.event {
            NotificationEvent::NewFollower => {
                if n > 1 {
                    format!("{n} new followers")
                } else {
                    "You have a new follower".to_string()
                }
            }
            NotificationEvent::NewComment { story_title, .. } => {
                if n > 1 {
                    format!("{n} new comments on \"{story_title}\"")
                } else {
                    format!("New comment on \"{story_title}\"")
                }
            }
            NotificationEvent::CommentReply { .. } => "New reply to your comment".to_string(),
            NotificationEvent::NewRating { story_title, .. } => {
                if n > 1 {
                    format!("{n} new ratings on \"{story_title}\"")
                } else {
                    format!("New rating on \"{story_title}\"")
                }
            }
            NotificationEvent::RatingReply { .. } => "New reply to your rating".to_string(),
            NotificationEvent::Like { .. } => {
                if n > 1 {
                    format!("{n} likes on your comment")
                } else {
                    "Your comment was liked".to_string()
                }
            }
            NotificationEvent::NewChapter { story_title, .. } => {
                format!("New chapter of \"{story_title}\"")
            }
            NotificationEvent::SystemAnnouncement { title, .. } => title.clone(),
            NotificationEvent::LevelUp { .. } => "Level up!".to_string(),
        }
    }

    /// Deterministic notification body.
    pub fn body(&self) -> String {
        let n = self.actor_count;
        match &self.event {
            NotificationEvent::NewFollower => {
                if n > 1 {
                    format!("{n} people started following you.")
                } else {
                    "Someone started following you.".to_string()
                }
            }
            NotificationEvent::NewComment { story_title, .. } => {
                if n > 1 {
                    format!("{n} readers commented on your story \"{story_title}\".")
                } else {
                    format!("Someone commented on your story \"{story_title}\".")
                }
            }
            NotificationEvent::CommentReply { story_title, .. } => {
                format!("Someone replied to your comment on \"{story_title}\".")
            }
            NotificationEvent::NewRating { story_title, .. } => {
                if n > 1 {
                    format!("Your story \"{story_title}\" received {n} new ratings.")
                } else {
                    format!("Your story \"{story_title}\" received a new rating.")
                }
            }
            NotificationEvent::RatingReply { story_title, .. } => {
                format!("Someone replied to your rating of \"{story_title}\".")
            }
            NotificationEvent::Like { story_title, .. } => {
                if n > 1 {
                    format!("{n} people liked your comment on \"{story_title}\".")
                } else {
                    format!("Someone liked your comment on \"{story_title}\".")
                }
            }
            NotificationEvent::NewChapter {
                story_title,
                chapter_title,
                ..
            } => {
                format!("\"{chapter_title}\" of \"{story_title}\" is now available.")
            }
            NotificationEvent::SystemAnnouncement { message, .. } => message.clone(),
            NotificationEvent::LevelUp { level } => {
                format!("You reached level {level}.")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
