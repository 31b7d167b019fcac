pub mod admin;
pub mod collection;
pub mod content;
pub mod health;
pub mod personal;

use axum::Router;

use crate::state::AppState;

/// Build the `/answer/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /collection/switch                        bookmark toggle (auth)
///
/// /personal/{kind}/page                     a user's items
/// /personal/{kind}/top                      a user's best-scored items
/// /personal/{kind}/collection/page          caller's bookmarks (auth)
///
/// /{kind}                                   create, edit, delete (auth)
/// /{kind}/page                              paginated listing
/// /{kind}/info                              detail
/// /{kind}/similar                           similar titles
/// /{kind}/similar/tag                       hottest items sharing a tag
/// /{kind}/sitemap                           stored sitemap page
/// /{kind}/status                            close (auth)
/// /{kind}/reopen                            reopen (auth)
/// /{kind}/operation                         pin, unpin, hide, show (auth)
/// /{kind}/recover                           undelete (auth)
/// ```
///
/// `{kind}` is one of `question`, `article`, `quote`, `quote_author`,
/// `quote_piece`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(collection::router())
        .merge(personal::router())
        .merge(content::router())
}

/// Build the `/answer/admin/api` route tree (admin or moderator).
///
/// ```text
/// /{kind}/page                              moderation listing
/// /{kind}/status                            set any status
/// ```
pub fn admin_routes() -> Router<AppState> {
    admin::router()
}
