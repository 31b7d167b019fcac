//! Activity bus for content moderation and authoring.
//!
//! - [`ActivityBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ActivityEvent`]: one `{object_type}.{action}` activity.
//! - [`ActivityPersistence`]: background subscriber that writes every event
//!   to the `activities` table.

pub mod bus;
pub mod persistence;

pub use bus::{ActivityBus, ActivityEvent};
pub use persistence::ActivityPersistence;
