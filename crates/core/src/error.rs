//! Domain-level error taxonomy.
//!
//! [`CoreError`] is the error type shared across all layers above the
//! database driver. Store-specific errors are translated into this
//! taxonomy (or into HTTP variants) at the persistence and API seams;
//! nothing above those seams inspects driver error codes.

use crate::types::DbId;

/// A domain-level error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist, or is not visible to the
    /// caller. Ownership misses deliberately surface as `NotFound` so a
    /// caller cannot probe for the existence of other users' records.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind for the error message (e.g. `"Story"`).
        entity: &'static str,
        /// The id that was looked up.
        id: DbId,
    },

    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state (e.g. unique violation).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An internal invariant was violated. Details are logged, never
    /// surfaced to callers.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_includes_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Story",
            id: 42,
        };
        assert_eq!(err.to_string(), "Story with id 42 not found");
    }

    #[test]
    fn validation_display() {
        let err = CoreError::Validation("limit out of range".into());
        assert_eq!(err.to_string(), "Validation error: limit out of range");
    }
}
