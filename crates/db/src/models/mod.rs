//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the insert DTOs its repository accepts.

pub mod activity;
pub mod captcha;
pub mod collection;
pub mod content;
pub mod revision;
pub mod sitemap;
pub mod tag;
pub mod user;
