//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod action_record_repo;
pub mod activity_repo;
pub mod captcha_repo;
pub mod collection_repo;
pub mod content_repo;
pub mod revision_repo;
pub mod sitemap_repo;
pub mod tag_repo;
pub mod user_repo;

pub use action_record_repo::ActionRecordRepo;
pub use activity_repo::ActivityRepo;
pub use captcha_repo::CaptchaRepo;
pub use collection_repo::CollectionRepo;
pub use content_repo::ContentRepo;
pub use revision_repo::RevisionRepo;
pub use sitemap_repo::SitemapRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
