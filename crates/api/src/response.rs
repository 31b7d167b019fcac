//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paged endpoints put a
//! [`PageModel`] inside it.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of results plus the total number of matches.
#[derive(Debug, Serialize)]
pub struct PageModel<T: Serialize> {
    pub count: i64,
    pub list: Vec<T>,
}

impl<T: Serialize> PageModel<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            list: Vec::new(),
        }
    }
}
