//! Request-independent business logic shared by the handlers.
//!
//! - [`rank`]: loads the requesting user and resolves their capabilities.
//! - [`captcha`]: the captcha gate on rate-limited writes.
//! - [`tags`]: tag resolution for filters and for create/update payloads.
//! - [`format`]: list and detail response shapes.
//! - [`content`]: the create/edit/moderate pipeline for every kind.

pub mod captcha;
pub mod content;
pub mod format;
pub mod rank;
pub mod tags;
