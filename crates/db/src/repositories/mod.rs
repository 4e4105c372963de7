//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod notification_preference_repo;
pub mod notification_repo;
pub mod story_repo;
pub mod user_repo;
pub mod view_repo;

pub use notification_preference_repo::NotificationPreferenceRepo;
pub use notification_repo::NotificationRepo;
pub use story_repo::StoryRepo;
pub use user_repo::UserRepo;
pub use view_repo::ViewRepo;
