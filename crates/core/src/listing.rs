//! Listing orders, pagination and visibility rules for content pages.
//!
//! This module decides *what* a page query means; the repository layer turns
//! a [`ListPlan`] into SQL.

use serde::{Deserialize, Serialize};

use crate::hotness::HOT_IN_DAYS;
use crate::roles;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of items per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// The `active` order only considers items created within this many days
/// when no explicit `in_days` window is given.
pub const ACTIVE_CREATED_WINDOW_DAYS: i64 = 180;

/// The `active` order only considers items whose last post update falls
/// within this many days.
pub const ACTIVE_UPDATED_WINDOW_DAYS: i64 = 90;

/// Clamp a user-provided page size to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
}

impl PageWindow {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            page_size: clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Page ordering strategies. Pinned items always sort first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrder {
    #[default]
    Newest,
    Active,
    Hot,
    Score,
    Unanswered,
}

impl ListOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            ListOrder::Newest => "newest",
            ListOrder::Active => "active",
            ListOrder::Hot => "hot",
            ListOrder::Score => "score",
            ListOrder::Unanswered => "unanswered",
        }
    }

    /// `ORDER BY` clause body (without the keyword). Column names are
    /// unqualified and shared by every content table.
    pub fn order_by(self) -> &'static str {
        match self {
            ListOrder::Newest | ListOrder::Unanswered => "pin DESC, created_at DESC",
            ListOrder::Active => "pin DESC, post_update_time DESC, updated_at DESC",
            ListOrder::Hot => "pin DESC, hot_score DESC",
            ListOrder::Score => "pin DESC, vote_count DESC, view_count DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Whether hidden items appear when listing `listed_user`'s content.
///
/// Only the user themself and staff see hidden items, and only on
/// user-filtered listings. Anonymous requests never do.
pub fn show_hidden(
    requester_id: Option<DbId>,
    requester_role: Option<&str>,
    listed_user: Option<DbId>,
) -> bool {
    match (requester_id, listed_user) {
        (Some(requester), Some(listed)) => {
            requester == listed || requester_role.is_some_and(roles::is_staff)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Fully resolved filter for one page query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlan {
    pub order: ListOrder,
    pub window: PageWindow,
    /// Items must carry at least one of these tags (available relations only).
    pub tag_ids: Vec<DbId>,
    pub user_id: Option<DbId>,
    /// Include hidden items. Ignored unless `user_id` is set.
    pub show_hidden: bool,
    pub show_pending: bool,
    /// Only items created within this many days. Zero disables the window.
    pub in_days: i64,
    /// Only items created within this many days, applied by the `active`
    /// order when `in_days` is zero.
    pub created_window_days: Option<i64>,
    /// Only items whose `post_update_time` falls within this many days.
    pub updated_window_days: Option<i64>,
    /// Only items with no answers.
    pub unanswered_only: bool,
}

impl ListPlan {
    pub fn new(order: ListOrder, window: PageWindow) -> Self {
        Self {
            order,
            window,
            tag_ids: Vec::new(),
            user_id: None,
            show_hidden: false,
            show_pending: false,
            in_days: 0,
            created_window_days: None,
            updated_window_days: None,
            unanswered_only: false,
        }
    }

    pub fn with_tags(mut self, tag_ids: Vec<DbId>) -> Self {
        self.tag_ids = tag_ids;
        self
    }

    pub fn with_user(mut self, user_id: Option<DbId>, show_hidden: bool) -> Self {
        self.user_id = user_id;
        self.show_hidden = user_id.is_some() && show_hidden;
        self
    }

    pub fn with_pending(mut self, show_pending: bool) -> Self {
        self.show_pending = show_pending;
        self
    }

    pub fn with_in_days(mut self, in_days: Option<i64>) -> Self {
        self.in_days = in_days.unwrap_or(0).max(0);
        self
    }

    /// Apply the order-specific constraints. Call after every other builder.
    pub fn finish(mut self) -> Self {
        match self.order {
            ListOrder::Hot => self.in_days = HOT_IN_DAYS,
            ListOrder::Active => {
                if self.in_days == 0 {
                    self.created_window_days = Some(ACTIVE_CREATED_WINDOW_DAYS);
                }
                self.updated_window_days = Some(ACTIVE_UPDATED_WINDOW_DAYS);
            }
            ListOrder::Unanswered => self.unanswered_only = true,
            ListOrder::Newest | ListOrder::Score => {}
        }
        self
    }

    /// `show = 1` must be enforced for this query.
    pub fn requires_shown(&self) -> bool {
        self.user_id.is_none() || !self.show_hidden
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- pagination ----------------------------------------------------------

    #[test]
    fn clamp_limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    #[test]
    fn page_window_offsets() {
        assert_eq!(PageWindow::new(None, None).offset(), 0);
        assert_eq!(PageWindow::new(Some(3), Some(10)).offset(), 20);
        assert_eq!(PageWindow::new(Some(-2), Some(10)).page, 1);
    }

    // -- ordering ------------------------------------------------------------

    #[test]
    fn every_order_sorts_pinned_first() {
        for order in [
            ListOrder::Newest,
            ListOrder::Active,
            ListOrder::Hot,
            ListOrder::Score,
            ListOrder::Unanswered,
        ] {
            assert!(order.order_by().starts_with("pin DESC"));
        }
    }

    #[test]
    fn order_parses_from_query_value() {
        let order: ListOrder = serde_json::from_value(serde_json::json!("unanswered")).unwrap();
        assert_eq!(order, ListOrder::Unanswered);
        assert_eq!(ListOrder::default(), ListOrder::Newest);
    }

    // -- visibility ----------------------------------------------------------

    #[test]
    fn owner_sees_own_hidden_items() {
        assert!(show_hidden(Some(7), Some("user"), Some(7)));
    }

    #[test]
    fn other_users_do_not_see_hidden_items() {
        assert!(!show_hidden(Some(8), Some("user"), Some(7)));
        assert!(!show_hidden(None, None, Some(7)));
    }

    #[test]
    fn staff_see_hidden_items_on_user_listings() {
        assert!(show_hidden(Some(1), Some("moderator"), Some(7)));
        assert!(show_hidden(Some(1), Some("admin"), Some(7)));
    }

    #[test]
    fn unfiltered_listing_never_shows_hidden() {
        assert!(!show_hidden(Some(1), Some("admin"), None));
        let plan = ListPlan::new(ListOrder::Newest, PageWindow::new(None, None))
            .with_user(None, true)
            .finish();
        assert!(plan.requires_shown());
    }

    // -- plan ----------------------------------------------------------------

    #[test]
    fn hot_forces_ninety_day_window() {
        let plan = ListPlan::new(ListOrder::Hot, PageWindow::new(None, None))
            .with_in_days(Some(7))
            .finish();
        assert_eq!(plan.in_days, HOT_IN_DAYS);
    }

    #[test]
    fn active_adds_created_window_only_without_in_days() {
        let plan = ListPlan::new(ListOrder::Active, PageWindow::new(None, None)).finish();
        assert_eq!(plan.created_window_days, Some(180));
        assert_eq!(plan.updated_window_days, Some(90));

        let plan = ListPlan::new(ListOrder::Active, PageWindow::new(None, None))
            .with_in_days(Some(30))
            .finish();
        assert_eq!(plan.created_window_days, None);
        assert_eq!(plan.in_days, 30);
    }

    #[test]
    fn unanswered_filters_on_answer_count() {
        let plan = ListPlan::new(ListOrder::Unanswered, PageWindow::new(None, None)).finish();
        assert!(plan.unanswered_only);
    }
}
