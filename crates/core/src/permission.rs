//! Rank-based capabilities and the per-item `member_actions` list.
//!
//! Admins and moderators hold every capability. Ordinary users earn each one
//! when their rank reaches the action's threshold; actions without a
//! threshold are reserved for staff.

use serde::Serialize;

use crate::content::ContentKind;
use crate::roles;
use crate::status::{ContentStatus, PinState, ShowState};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Actions & thresholds
// ---------------------------------------------------------------------------

/// Permission-gated actions on a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionAction {
    Add,
    Edit,
    EditWithoutReview,
    Delete,
    Close,
    Reopen,
    VoteUp,
    VoteDown,
    Pin,
    Unpin,
    Hide,
    Show,
    Undeleted,
}

impl PermissionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionAction::Add => "add",
            PermissionAction::Edit => "edit",
            PermissionAction::EditWithoutReview => "edit_without_review",
            PermissionAction::Delete => "delete",
            PermissionAction::Close => "close",
            PermissionAction::Reopen => "reopen",
            PermissionAction::VoteUp => "vote_up",
            PermissionAction::VoteDown => "vote_down",
            PermissionAction::Pin => "pin",
            PermissionAction::Unpin => "unpin",
            PermissionAction::Hide => "hide",
            PermissionAction::Show => "show",
            PermissionAction::Undeleted => "undeleted",
        }
    }

    /// Minimum rank for an ordinary user. `None` means staff only.
    pub fn rank_threshold(self) -> Option<i32> {
        match self {
            PermissionAction::Add => Some(1),
            PermissionAction::Edit => Some(200),
            PermissionAction::EditWithoutReview => Some(2000),
            PermissionAction::Close | PermissionAction::Reopen => Some(2000),
            PermissionAction::VoteUp => Some(15),
            PermissionAction::VoteDown => Some(125),
            PermissionAction::Delete
            | PermissionAction::Pin
            | PermissionAction::Unpin
            | PermissionAction::Hide
            | PermissionAction::Show
            | PermissionAction::Undeleted => None,
        }
    }
}

/// Permission key, e.g. `article.edit_without_review`.
pub fn permission_key(kind: ContentKind, action: PermissionAction) -> String {
    format!("{}.{}", kind.object_type(), action.as_str())
}

/// Key of the capability to attach reserved tags.
pub const USE_RESERVED_TAG_KEY: &str = "tag.use_reserved_tag";

/// The acting user as far as permission checks are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor<'a> {
    pub user_id: DbId,
    pub role: &'a str,
    pub rank: i32,
}

impl Actor<'_> {
    pub fn is_staff(&self) -> bool {
        roles::is_staff(self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == roles::ROLE_ADMIN
    }

    /// Whether the rank service grants `action`.
    pub fn can(&self, action: PermissionAction) -> bool {
        if self.is_staff() {
            return true;
        }
        action
            .rank_threshold()
            .is_some_and(|threshold| self.rank >= threshold)
    }

    pub fn can_use_reserved_tag(&self) -> bool {
        self.is_staff()
    }
}

// ---------------------------------------------------------------------------
// Capability set
// ---------------------------------------------------------------------------

/// Resolved capabilities of one user for one content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentPermission {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_edit_without_review: bool,
    pub can_delete: bool,
    pub can_close: bool,
    pub can_reopen: bool,
    pub can_pin: bool,
    pub can_unpin: bool,
    pub can_hide: bool,
    pub can_show: bool,
    pub can_use_reserved_tag: bool,
    pub can_recover: bool,
}

impl ContentPermission {
    /// Capabilities for `actor`, or none for anonymous requests.
    pub fn resolve(actor: Option<&Actor<'_>>) -> Self {
        let Some(actor) = actor else {
            return Self::default();
        };
        Self {
            can_add: actor.can(PermissionAction::Add),
            can_edit: actor.can(PermissionAction::Edit),
            can_edit_without_review: actor.can(PermissionAction::EditWithoutReview),
            can_delete: actor.can(PermissionAction::Delete),
            can_close: actor.can(PermissionAction::Close),
            can_reopen: actor.can(PermissionAction::Reopen),
            can_pin: actor.can(PermissionAction::Pin),
            can_unpin: actor.can(PermissionAction::Unpin),
            can_hide: actor.can(PermissionAction::Hide),
            can_show: actor.can(PermissionAction::Show),
            can_use_reserved_tag: actor.can_use_reserved_tag(),
            can_recover: actor.can(PermissionAction::Undeleted),
        }
    }

    /// Narrow the capability set to what makes sense for an item in the given
    /// state.
    pub fn adjust_for_state(mut self, status: ContentStatus, pin: PinState, show: ShowState) -> Self {
        if status != ContentStatus::Closed {
            self.can_reopen = false;
        }
        if status == ContentStatus::Closed {
            self.can_close = false;
        }
        match pin {
            PinState::Pinned => {
                self.can_pin = false;
                self.can_hide = false;
            }
            PinState::Unpinned => self.can_unpin = false,
        }
        match show {
            ShowState::Shown => self.can_show = false,
            ShowState::Hidden => {
                self.can_hide = false;
                self.can_pin = false;
            }
        }
        self
    }
}

/// Deleted and pending items are visible only to their author and to users
/// holding the reopen capability.
pub fn can_view(
    status: ContentStatus,
    author_id: DbId,
    viewer_id: Option<DbId>,
    permission: &ContentPermission,
) -> bool {
    match status {
        ContentStatus::Deleted | ContentStatus::Pending => {
            permission.can_reopen || viewer_id == Some(author_id)
        }
        ContentStatus::Available | ContentStatus::Closed => true,
    }
}

// ---------------------------------------------------------------------------
// Member actions
// ---------------------------------------------------------------------------

/// One entry of the `member_actions` list on a detail response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberAction {
    pub action: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

const fn member_action(action: &'static str, name: &'static str, kind: &'static str) -> MemberAction {
    MemberAction { action, name, kind }
}

/// Build the ordered action list shown to `viewer_id` for an item.
///
/// `permission` must already be adjusted for the item's state.
pub fn member_actions(
    viewer_id: Option<DbId>,
    author_id: DbId,
    status: ContentStatus,
    permission: &ContentPermission,
) -> Vec<MemberAction> {
    let is_owner = viewer_id == Some(author_id);
    let available = status == ContentStatus::Available;
    let deleted = status == ContentStatus::Deleted;
    let mut actions = Vec::new();

    if viewer_id.is_some() {
        actions.push(member_action("report", "Flag", "reason"));
    }
    if (permission.can_edit || is_owner) && !deleted {
        actions.push(member_action("edit", "Edit", "edit"));
    }
    if permission.can_close && available {
        actions.push(member_action("close", "Close", "confirm"));
    }
    if permission.can_reopen && status == ContentStatus::Closed {
        actions.push(member_action("reopen", "Reopen", "confirm"));
    }
    if permission.can_pin && available {
        actions.push(member_action("pin", "Pin", "confirm"));
    }
    if permission.can_hide && available {
        actions.push(member_action("hide", "Hide", "confirm"));
    }
    if permission.can_unpin && available {
        actions.push(member_action("unpin", "Unpin", "confirm"));
    }
    if permission.can_show && available {
        actions.push(member_action("show", "Show", "confirm"));
    }
    if (permission.can_delete || is_owner) && !deleted {
        actions.push(member_action("delete", "Delete", "confirm"));
    }
    if permission.can_recover && deleted {
        actions.push(member_action("undelete", "Undelete", "confirm"));
    }
    actions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
