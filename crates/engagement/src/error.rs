//! Error type shared by the engagement engines.

use novelink_core::error::CoreError;

/// An engine-level failure: either a domain error or a store error that
/// survived the bounded retry in `novelink_db::retry`.
#[derive(Debug, thiserror::Error)]
pub enum EngagementError {
    /// A domain-level error (not-found, validation, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
