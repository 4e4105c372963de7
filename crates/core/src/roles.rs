//! Well-known role name constants.
//!
//! These must match the values stored in the `users.role` column and the
//! `role` claim embedded in access tokens.

/// Full administrative access, including system announcements.
pub const ROLE_ADMIN: &str = "admin";

/// A publishing author.
pub const ROLE_AUTHOR: &str = "author";

/// A regular reader account. Default for new users.
pub const ROLE_READER: &str = "reader";
