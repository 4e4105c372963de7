//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                 -> list_notifications
/// GET    /unread-count     -> unread_count
/// POST   /archive-all      -> archive_all
/// POST   /{id}/read        -> mark_read
/// POST   /{id}/archive     -> mark_archived
///
/// GET    /preferences      -> get_preferences
/// PUT    /preferences      -> update_preferences
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Core notification endpoints
        .route("/", get(notification::list_notifications))
        .route("/unread-count", get(notification::unread_count))
        .route("/archive-all", post(notification::archive_all))
        .route("/{id}/read", post(notification::mark_read))
        .route("/{id}/archive", post(notification::mark_archived))
        // Preferences endpoints
        .route(
            "/preferences",
            get(notification::get_preferences).put(notification::update_preferences),
        )
}
