pub mod admin;
pub mod health;
pub mod notification;
pub mod view;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /views/track                     record a story view (POST, optional auth)
///
/// /notifications                   list (?archived, page, limit)
/// /notifications/unread-count      unread badge count (GET)
/// /notifications/archive-all       archive whole inbox (POST)
/// /notifications/{id}/read         mark read (POST)
/// /notifications/{id}/archive      archive one (POST)
/// /notifications/preferences       get/update preferences (GET, PUT)
///
/// /admin/announcements             broadcast system announcement (POST, admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // View tracking (anonymous allowed).
        .nest("/views", view::router())
        // Notifications and preferences.
        .nest("/notifications", notification::router())
        // Admin-only operations.
        .nest("/admin", admin::router())
}
