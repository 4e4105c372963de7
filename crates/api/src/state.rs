use std::sync::Arc;

use novelink_engagement::{NotificationEngine, ViewTracker};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: novelink_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Notification aggregation engine.
    pub notifications: Arc<NotificationEngine>,
    /// View deduplication engine.
    pub views: Arc<ViewTracker>,
}
