//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`]: the authenticated user from a JWT Bearer token.
//! - [`auth::OptionalAuthUser`]: the same, for endpoints open to anonymous
//!   readers.
//! - [`rbac::RequireStaff`]: requires the `admin` or `moderator` role.

pub mod auth;
pub mod rbac;
