//! Route definitions for admin-only operations.

use axum::routing::post;
use axum::Router;

use crate::handlers::announcement;
use crate::state::AppState;

/// Routes mounted at `/admin`. Role enforcement happens in the handlers.
pub fn router() -> Router<AppState> {
    Router::new().route("/announcements", post(announcement::create_announcement))
}
