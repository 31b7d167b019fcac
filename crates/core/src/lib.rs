//! Domain logic shared by the API server, the repository layer, and the
//! background worker.
//!
//! Nothing in this crate touches the database or the network; every module
//! is pure and unit-tested in place.

pub mod content;
pub mod error;
pub mod hotness;
pub mod listing;
pub mod operation;
pub mod permission;
pub mod roles;
pub mod sitemap;
pub mod status;
pub mod text;
pub mod types;
pub mod validation;
