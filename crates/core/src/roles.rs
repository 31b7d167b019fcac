//! Well-known role name constants.
//!
//! These must match the `ck_users_role` constraint in `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_USER: &str = "user";

/// Admins and moderators bypass rank thresholds, captcha gates and
/// visibility filters.
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_MODERATOR
}
