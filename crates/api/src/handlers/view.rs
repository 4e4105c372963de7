//! Handler for the view-tracking endpoint.
//!
//! View tracking is best-effort telemetry: a store failure after the
//! bounded retries degrades to "not counted" rather than surfacing an
//! error to the reader. Only an unknown or deleted story is a 404.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use novelink_core::types::DbId;
use novelink_core::viewer::ViewerIdentity;
use novelink_engagement::EngagementError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /views/track`.
///
/// The mobile client still sends `novelId`; accept both spellings.
#[derive(Debug, Deserialize)]
pub struct TrackViewRequest {
    #[serde(alias = "novelId")]
    pub novel_id: DbId,
}

/// Response payload for `POST /views/track`.
#[derive(Debug, Serialize)]
pub struct TrackViewResponse {
    /// Whether the tracking attempt itself succeeded.
    pub success: bool,
    /// Whether this request incremented the view counter.
    pub counted: bool,
    /// The story's view count after the attempt (0 when degraded).
    pub view_count: i64,
}

/// POST /api/v1/views/track
///
/// Record a story read. Authentication is optional: anonymous readers
/// are identified by a hash of the proxy-reported IP and user agent.
pub async fn track_view(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<TrackViewRequest>,
) -> AppResult<Json<DataResponse<TrackViewResponse>>> {
    let ip = client_ip(&headers);
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let viewer = ViewerIdentity::from_request(
        auth.map(|user| user.user_id),
        ip.as_deref(),
        user_agent,
    );

    match state.views.track(input.novel_id, &viewer).await {
        Ok(recorded) => Ok(Json(DataResponse {
            data: TrackViewResponse {
                success: true,
                counted: recorded.counted,
                view_count: recorded.view_count,
            },
        })),
        Err(EngagementError::Core(core)) => Err(AppError::Core(core)),
        Err(EngagementError::Database(err)) => {
            tracing::warn!(
                novel_id = input.novel_id,
                error = %err,
                "View tracking degraded to not counted"
            );
            Ok(Json(DataResponse {
                data: TrackViewResponse {
                    success: false,
                    counted: false,
                    view_count: 0,
                },
            }))
        }
    }
}

/// Resolve the client IP from proxy headers.
///
/// Prefers the first entry of `x-forwarded-for`, falling back to
/// `x-real-ip`. Returns `None` when neither header carries a value.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.7, 10.0.0.1, 10.0.0.2".parse().unwrap(),
        );
        headers.insert("x-real-ip", "10.0.0.9".parse().unwrap());
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "203.0.113.9".parse().unwrap());
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn no_proxy_headers_means_no_ip() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
    }
}
