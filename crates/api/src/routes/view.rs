//! Route definitions for view tracking.
//!
//! Authentication is optional: anonymous readers are tracked by hashed
//! request metadata.

use axum::routing::post;
use axum::Router;

use crate::handlers::view;
use crate::state::AppState;

/// Routes mounted at `/views`.
pub fn router() -> Router<AppState> {
    Router::new().route("/track", post(view::track_view))
}
