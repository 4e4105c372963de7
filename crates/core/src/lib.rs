//! Novelink domain core.
//!
//! Zero-internal-dependency crate shared by the persistence layer, the
//! engagement engines, and the API server:
//!
//! - [`types`] — database ID and timestamp aliases.
//! - [`error`] — the domain error taxonomy.
//! - [`roles`] — well-known role name constants.
//! - [`notification`] — notification kinds, categories, priorities, the
//!   typed event payload, aggregation keys, and rendering.
//! - [`viewer`] — reader identity and viewer-key derivation for view
//!   deduplication.

pub mod error;
pub mod notification;
pub mod roles;
pub mod types;
pub mod viewer;
