//! Novelink engagement accounting.
//!
//! The two stateful engines behind the platform's engagement features,
//! both invoked synchronously from request handlers:
//!
//! - [`ViewTracker`] — decides whether a story read counts as a new
//!   view, deduplicating repeat visits per viewer within a short window.
//! - [`NotificationEngine`] — converts domain events into per-user
//!   notifications, merging repeats within a rolling window, honoring
//!   preferences, and driving the read/archive lifecycle.
//! - [`delivery`] — the outbound email collaborator (SMTP). Failures are
//!   logged, never propagated.

pub mod delivery;
pub mod error;
pub mod notifications;
pub mod views;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use error::EngagementError;
pub use notifications::{NotificationEngine, PublishOutcome, SuppressReason};
pub use views::ViewTracker;
