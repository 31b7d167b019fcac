//! HTTP handlers.
//!
//! Handlers stay thin: extract, load the requester, call into
//! [`crate::services`], wrap the result in a [`crate::response::DataResponse`].

pub mod admin;
pub mod content;
pub mod personal;

use answer_core::content::ContentKind;

use crate::error::AppResult;

/// Parse the `{kind}` path segment. Unknown kinds are a 400.
pub(crate) fn parse_kind(segment: &str) -> AppResult<ContentKind> {
    Ok(segment.parse::<ContentKind>()?)
}
