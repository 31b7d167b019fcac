//! Shared query parameter types for API handlers.

use answer_core::listing::{ListOrder, PageWindow};
use answer_core::types::DbId;
use serde::Deserialize;

/// `?page=&page_size=` pagination. Values are clamped by [`PageWindow`].
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.page_size)
    }
}

/// `?id=` lookups.
#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: DbId,
}

#[derive(Debug, Default, Deserialize)]
pub struct UsernameParams {
    pub username: Option<String>,
}

/// Query parameters of the public content page.
#[derive(Debug, Default, Deserialize)]
pub struct ContentPageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub order: ListOrder,
    /// Tag slug; synonyms of its main tag are included.
    pub tag: Option<String>,
    pub tag_id: Option<DbId>,
    pub username: Option<String>,
    pub in_days: Option<i64>,
}

impl ContentPageParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.page_size)
    }
}

/// `?title=` for similar-title suggestions.
#[derive(Debug, Default, Deserialize)]
pub struct SimilarParams {
    #[serde(default)]
    pub title: String,
}

/// `?page=` of a stored sitemap.
#[derive(Debug, Default, Deserialize)]
pub struct SitemapParams {
    pub page: Option<i64>,
}

/// Query parameters of a personal page.
#[derive(Debug, Default, Deserialize)]
pub struct PersonalPageParams {
    pub username: Option<String>,
    #[serde(default)]
    pub order: ListOrder,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PersonalPageParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.page_size)
    }
}

/// Query parameters of the admin content page.
#[derive(Debug, Default, Deserialize)]
pub struct AdminPageParams {
    /// available | closed | deleted | pending (default available).
    pub status: Option<String>,
    /// `{kind}:<id>` or a title fragment.
    pub query: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl AdminPageParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.page_size)
    }
}
