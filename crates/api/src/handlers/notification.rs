//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Rows are
//! rendered at read time: title, body, and priority derive from the
//! stored kind and payload.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use novelink_core::notification::{NotificationData, NotificationKind, NotificationPriority};
use novelink_core::types::{DbId, Timestamp};
use novelink_db::models::notification::{Notification, UpdatePreferences};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return archived notifications instead of the inbox.
    /// Defaults to `false`.
    pub archived: Option<bool>,
    /// 1-based page number. Defaults to 1, clamped to >= 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 50, clamped to [1, 100].
    pub limit: Option<i64>,
}

/// A notification as rendered for clients.
#[derive(Debug, Serialize)]
pub struct NotificationView {
    pub id: DbId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub priority: &'static str,
    pub actor_count: i64,
    pub is_read: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Render a stored row into its client-facing form.
fn render(notification: Notification) -> NotificationView {
    let priority = NotificationKind::parse(&notification.kind)
        .map(|kind| kind.priority())
        .unwrap_or(NotificationPriority::Normal);

    let (title, body, actor_count) =
        match serde_json::from_value::<NotificationData>(notification.data) {
            Ok(data) => (data.title(), data.body(), data.actor_count),
            Err(err) => {
                tracing::warn!(
                    notification_id = notification.id,
                    error = %err,
                    "Unreadable notification payload"
                );
                ("Notification".to_string(), String::new(), 1)
            }
        };

    NotificationView {
        id: notification.id,
        kind: notification.kind,
        title,
        body,
        priority: priority.as_str(),
        actor_count,
        is_read: notification.is_read,
        is_archived: notification.is_archived,
        created_at: notification.created_at,
        updated_at: notification.updated_at,
    }
}

// ---------------------------------------------------------------------------
// Notification lifecycle
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications, inbox by default or
/// archive with `?archived=true`, most recent activity first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<NotificationView>>>> {
    let rows = state
        .notifications
        .list(
            auth.user_id,
            params.archived.unwrap_or(false),
            params.page,
            params.limit,
        )
        .await?;

    let data = rows.into_iter().map(render).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/notifications/unread-count
///
/// Return the number of unread inbox notifications for badge display.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.notifications.unread_count(auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single notification as read. Idempotent. Returns 404 if the
/// notification does not exist or belongs to another user.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<DataResponse<NotificationView>>> {
    let notification = state
        .notifications
        .mark_read(notification_id, auth.user_id)
        .await?;
    Ok(Json(DataResponse {
        data: render(notification),
    }))
}

/// POST /api/v1/notifications/{id}/archive
///
/// Archive a single notification. Idempotent; archiving is
/// one-directional. Same ownership contract as mark-read.
pub async fn mark_archived(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<DataResponse<NotificationView>>> {
    let notification = state
        .notifications
        .mark_archived(notification_id, auth.user_id)
        .await?;
    Ok(Json(DataResponse {
        data: render(notification),
    }))
}

/// POST /api/v1/notifications/archive-all
///
/// Archive the authenticated user's whole inbox.
/// Returns the number of notifications archived.
pub async fn archive_all(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.notifications.archive_all(auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "archived": count }
    })))
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/preferences
///
/// Get the authenticated user's notification preferences, creating the
/// defaults row on first access.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let prefs = state.notifications.preferences(auth.user_id).await?;

    Ok(Json(serde_json::json!({ "data": prefs })))
}

/// PUT /api/v1/notifications/preferences
///
/// Partially update the authenticated user's preferences. Only the
/// whitelisted boolean fields are applied; unknown fields are ignored.
pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<UpdatePreferences>,
) -> AppResult<Json<serde_json::Value>> {
    let prefs = state
        .notifications
        .update_preferences(auth.user_id, &patch)
        .await?;

    Ok(Json(serde_json::json!({ "data": prefs })))
}
