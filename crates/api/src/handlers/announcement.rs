//! Handler for admin system announcements.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use novelink_core::error::CoreError;
use novelink_core::roles::ROLE_ADMIN;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /admin/announcements`.
#[derive(Debug, Deserialize)]
pub struct CreateAnnouncement {
    pub title: String,
    pub message: String,
}

/// POST /api/v1/admin/announcements
///
/// Broadcast a system announcement to every active user. Admin only.
/// Returns the number of users notified.
pub async fn create_announcement(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAnnouncement>,
) -> AppResult<Json<serde_json::Value>> {
    if auth.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )));
    }

    if input.title.trim().is_empty() || input.message.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title and message must not be empty".into(),
        )));
    }

    let notified = state
        .notifications
        .broadcast_system(input.title.trim(), input.message.trim())
        .await?;

    Ok(Json(serde_json::json!({
        "data": { "notified": notified }
    })))
}
