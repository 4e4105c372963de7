//! Notification aggregation engine.
//!
//! Converts domain events into per-user notifications: suppresses
//! self-notification, honors per-category preferences, merges repeated
//! events of the same kind/target within a rolling window into a single
//! notification, and dispatches optional transactional emails. Also owns
//! the read/unread/archive lifecycle operations.

use std::sync::Arc;

use novelink_core::error::CoreError;
use novelink_core::notification::{NotificationData, NotificationEvent};
use novelink_core::types::DbId;
use novelink_db::models::notification::{Notification, NotificationPreference, UpdatePreferences};
use novelink_db::models::user::User;
use novelink_db::repositories::{NotificationPreferenceRepo, NotificationRepo, UserRepo};
use novelink_db::retry::with_retry;
use novelink_db::DbPool;

use crate::delivery::email::EmailDelivery;
use crate::error::EngagementError;

/// Rolling window within which repeated aggregable events merge into the
/// existing unread notification instead of creating a new row.
pub const AGGREGATION_WINDOW_SECS: f64 = 24.0 * 60.0 * 60.0;

/// Maximum page size for notification listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for notification listing.
const DEFAULT_LIMIT: i64 = 50;

/// Why a published event produced no notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// A user's own actions never notify themselves.
    SelfAction,
    /// The recipient disabled in-app delivery for this category.
    PreferenceDisabled,
}

/// The observable result of publishing one event.
#[derive(Debug)]
pub enum PublishOutcome {
    /// A fresh unread inbox notification was inserted.
    Created(Notification),
    /// The event was merged into an existing live notification.
    Merged(Notification),
    /// Nothing was written.
    Suppressed(SuppressReason),
}

impl PublishOutcome {
    /// The written notification, if any.
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Created(n) | Self::Merged(n) => Some(n),
            Self::Suppressed(_) => None,
        }
    }
}

/// Publishes domain events as notifications and serves their lifecycle.
pub struct NotificationEngine {
    pool: DbPool,
    mailer: Option<Arc<EmailDelivery>>,
}

impl NotificationEngine {
    /// Create an engine without email delivery.
    pub fn new(pool: DbPool) -> Self {
        Self { pool, mailer: None }
    }

    /// Attach the outbound email collaborator.
    pub fn with_mailer(mut self, mailer: Arc<EmailDelivery>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    // -----------------------------------------------------------------------
    // Publishing
    // -----------------------------------------------------------------------

    /// Publish one domain event to `recipient_id`.
    ///
    /// Decision order: self-suppression, then the recipient's in-app
    /// preference for the event's category, then the aggregation merge.
    /// The email side effect is fired after the write on a detached task
    /// and can never fail the publish.
    pub async fn publish(
        &self,
        recipient_id: DbId,
        actor_id: Option<DbId>,
        event: NotificationEvent,
    ) -> Result<PublishOutcome, EngagementError> {
        if actor_id == Some(recipient_id) {
            return Ok(PublishOutcome::Suppressed(SuppressReason::SelfAction));
        }

        let pool = &self.pool;
        let recipient = with_retry("users.find_by_id", || {
            UserRepo::find_by_id(pool, recipient_id)
        })
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: recipient_id,
        })?;

        let prefs = with_retry("notification_preferences.get_or_create", || {
            NotificationPreferenceRepo::get_or_create(pool, recipient_id)
        })
        .await?;

        let category = event.kind().category();
        if !prefs.in_app_enabled(category) {
            return Ok(PublishOutcome::Suppressed(SuppressReason::PreferenceDisabled));
        }

        let aggregation_key = if prefs.aggregation_enabled {
            event.aggregation_key()
        } else {
            None
        };

        let outcome = match &aggregation_key {
            Some(key) => self.merge_or_insert(recipient_id, actor_id, &event, key).await?,
            None => {
                let created = self.insert_fresh(recipient_id, actor_id, &event, None).await?;
                PublishOutcome::Created(created)
            }
        };

        if prefs.email_enabled(category) {
            if let Some(notification) = outcome.notification() {
                self.dispatch_email(&recipient, notification);
            }
        }

        Ok(outcome)
    }

    /// Publish a system announcement to every active user.
    ///
    /// Per-user failures are logged and skipped so one bad recipient
    /// cannot abort the broadcast. Returns the number of users notified.
    pub async fn broadcast_system(
        &self,
        title: &str,
        message: &str,
    ) -> Result<u64, EngagementError> {
        let pool = &self.pool;
        let user_ids = with_retry("users.list_active_ids", || UserRepo::list_active_ids(pool)).await?;

        let mut notified = 0;
        for user_id in user_ids {
            let event = NotificationEvent::SystemAnnouncement {
                title: title.to_string(),
                message: message.to_string(),
            };
            match self.publish(user_id, None, event).await {
                Ok(PublishOutcome::Created(_) | PublishOutcome::Merged(_)) => notified += 1,
                Ok(PublishOutcome::Suppressed(_)) => {}
                Err(err) => {
                    tracing::error!(user_id, error = %err, "Failed to deliver announcement");
                }
            }
        }

        Ok(notified)
    }

    /// Merge into the live in-window notification for (`recipient`,
    /// `key`), or insert a fresh row.
    ///
    /// The lookup and the guarded write are separate statements; if the
    /// row is read or archived in between, the write refuses and a fresh
    /// row is inserted instead. Two concurrent publishes for one key can
    /// therefore both insert -- a bounded duplicate, not a correctness
    /// collapse.
    async fn merge_or_insert(
        &self,
        recipient_id: DbId,
        actor_id: Option<DbId>,
        event: &NotificationEvent,
        key: &str,
    ) -> Result<PublishOutcome, EngagementError> {
        let pool = &self.pool;

        let live = with_retry("notifications.find_live_aggregable", || {
            NotificationRepo::find_live_aggregable(pool, recipient_id, key, AGGREGATION_WINDOW_SECS)
        })
        .await?;

        if let Some(live) = live {
            match serde_json::from_value::<NotificationData>(live.data.clone()) {
                Ok(mut data) => {
                    data.merge(event.clone(), actor_id);
                    let value = encode_data(&data)?;
                    let merged = with_retry("notifications.update_merged", || {
                        NotificationRepo::update_merged(pool, live.id, actor_id, &value)
                    })
                    .await?;
                    if let Some(merged) = merged {
                        return Ok(PublishOutcome::Merged(merged));
                    }
                    // Read or archived since the lookup; insert fresh below.
                }
                Err(err) => {
                    tracing::warn!(
                        notification_id = live.id,
                        error = %err,
                        "Unreadable aggregation payload, inserting fresh notification"
                    );
                }
            }
        }

        let created = self
            .insert_fresh(recipient_id, actor_id, event, Some(key))
            .await?;
        Ok(PublishOutcome::Created(created))
    }

    async fn insert_fresh(
        &self,
        recipient_id: DbId,
        actor_id: Option<DbId>,
        event: &NotificationEvent,
        aggregation_key: Option<&str>,
    ) -> Result<Notification, EngagementError> {
        let pool = &self.pool;
        let data = encode_data(&NotificationData::new(event.clone(), actor_id))?;
        let created = with_retry("notifications.insert", || {
            NotificationRepo::insert(
                pool,
                recipient_id,
                event.kind().as_str(),
                actor_id,
                aggregation_key,
                &data,
            )
        })
        .await?;
        Ok(created)
    }

    /// Fire-and-forget email dispatch. Never blocks or fails the caller.
    fn dispatch_email(&self, recipient: &User, notification: &Notification) {
        let Some(mailer) = &self.mailer else {
            return;
        };
        let data = match serde_json::from_value::<NotificationData>(notification.data.clone()) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(
                    notification_id = notification.id,
                    error = %err,
                    "Skipping email for unreadable notification payload"
                );
                return;
            }
        };

        let mailer = Arc::clone(mailer);
        let to_email = recipient.email.clone();
        tokio::spawn(async move {
            if let Err(err) = mailer.deliver(&to_email, &data).await {
                tracing::warn!(to = %to_email, error = %err, "Notification email failed");
            }
        });
    }

    // -----------------------------------------------------------------------
    // Lifecycle operations
    // -----------------------------------------------------------------------

    /// List a page of the user's notifications, filtered by archive
    /// state, most recent activity first.
    ///
    /// `limit` is clamped to [1, 100] (default 50); `page` is clamped to
    /// at least 1.
    pub async fn list(
        &self,
        user_id: DbId,
        archived: bool,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Notification>, EngagementError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let pool = &self.pool;
        let rows = with_retry("notifications.list", || {
            NotificationRepo::list_for_user(pool, user_id, archived, limit, offset)
        })
        .await?;
        Ok(rows)
    }

    /// Number of unread inbox notifications, for badge display.
    pub async fn unread_count(&self, user_id: DbId) -> Result<i64, EngagementError> {
        let pool = &self.pool;
        let count = with_retry("notifications.unread_count", || {
            NotificationRepo::unread_count(pool, user_id)
        })
        .await?;
        Ok(count)
    }

    /// Mark one notification as read. Idempotent; `NotFound` when the
    /// notification does not exist or belongs to another user.
    pub async fn mark_read(
        &self,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<Notification, EngagementError> {
        let pool = &self.pool;
        with_retry("notifications.mark_read", || {
            NotificationRepo::mark_read(pool, notification_id, user_id)
        })
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Notification",
                id: notification_id,
            }
            .into()
        })
    }

    /// Mark one notification as archived. Same contract as
    /// [`mark_read`](Self::mark_read); archiving is one-directional.
    pub async fn mark_archived(
        &self,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<Notification, EngagementError> {
        let pool = &self.pool;
        with_retry("notifications.mark_archived", || {
            NotificationRepo::mark_archived(pool, notification_id, user_id)
        })
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Notification",
                id: notification_id,
            }
            .into()
        })
    }

    /// Archive the user's whole inbox in one batch; returns the count.
    pub async fn archive_all(&self, user_id: DbId) -> Result<u64, EngagementError> {
        let pool = &self.pool;
        let count = with_retry("notifications.archive_all", || {
            NotificationRepo::archive_all(pool, user_id)
        })
        .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Preferences
    // -----------------------------------------------------------------------

    /// Get the user's preferences, creating the defaults row on first
    /// access.
    pub async fn preferences(
        &self,
        user_id: DbId,
    ) -> Result<NotificationPreference, EngagementError> {
        self.ensure_user(user_id).await?;
        let pool = &self.pool;
        let prefs = with_retry("notification_preferences.get_or_create", || {
            NotificationPreferenceRepo::get_or_create(pool, user_id)
        })
        .await?;
        Ok(prefs)
    }

    /// Apply a whitelisted partial update to the user's preferences.
    pub async fn update_preferences(
        &self,
        user_id: DbId,
        patch: &UpdatePreferences,
    ) -> Result<NotificationPreference, EngagementError> {
        self.ensure_user(user_id).await?;
        let pool = &self.pool;
        let prefs = with_retry("notification_preferences.update", || {
            NotificationPreferenceRepo::update(pool, user_id, patch)
        })
        .await?;
        Ok(prefs)
    }

    async fn ensure_user(&self, user_id: DbId) -> Result<(), EngagementError> {
        let pool = &self.pool;
        with_retry("users.find_by_id", || UserRepo::find_by_id(pool, user_id))
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })?;
        Ok(())
    }
}

/// Serialize a payload for storage.
fn encode_data(data: &NotificationData) -> Result<serde_json::Value, EngagementError> {
    serde_json::to_value(data)
        .map_err(|err| CoreError::Internal(format!("Unserializable notification data: {err}")).into())
}
