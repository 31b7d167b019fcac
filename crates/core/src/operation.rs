//! Moderation state machine: pin/hide operations, close/reopen, delete and
//! recover transitions, and the activity each one records.

use serde::{Deserialize, Serialize};

use crate::content::ContentKind;
use crate::error::CoreError;
use crate::status::{ContentStatus, PinState, ShowState, TagRelStatus};

// ---------------------------------------------------------------------------
// Activity keys
// ---------------------------------------------------------------------------

/// Actions recorded in the activity log as `{kind}.{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Asked,
    Edited,
    Closed,
    Reopened,
    Deleted,
    Undeleted,
    Pin,
    Unpin,
    Hide,
    Show,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::Asked => "asked",
            ActivityAction::Edited => "edited",
            ActivityAction::Closed => "closed",
            ActivityAction::Reopened => "reopened",
            ActivityAction::Deleted => "deleted",
            ActivityAction::Undeleted => "undeleted",
            ActivityAction::Pin => "pin",
            ActivityAction::Unpin => "unpin",
            ActivityAction::Hide => "hide",
            ActivityAction::Show => "show",
        }
    }
}

/// Activity type key, e.g. `quote_author.undeleted`.
pub fn activity_key(kind: ContentKind, action: ActivityAction) -> String {
    format!("{}.{}", kind.object_type(), action.as_str())
}

// ---------------------------------------------------------------------------
// Pin / hide operations
// ---------------------------------------------------------------------------

/// Display operations accepted by `PUT /{kind}/operation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Pin,
    Unpin,
    Hide,
    Show,
}

impl Operation {
    pub fn activity(self) -> ActivityAction {
        match self {
            Operation::Pin => ActivityAction::Pin,
            Operation::Unpin => ActivityAction::Unpin,
            Operation::Hide => ActivityAction::Hide,
            Operation::Show => ActivityAction::Show,
        }
    }
}

/// Result of applying an [`Operation`] to an item's display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationEffect {
    pub pin: PinState,
    pub show: ShowState,
    /// New status for the item's tag relations, when they must follow.
    pub tag_rels: Option<TagRelStatus>,
}

/// Apply a display operation. Returns `None` when the operation is refused
/// silently: hidden items cannot be pinned and pinned items cannot be hidden.
pub fn apply_operation(pin: PinState, show: ShowState, op: Operation) -> Option<OperationEffect> {
    if show == ShowState::Hidden && op == Operation::Pin {
        return None;
    }
    if pin == PinState::Pinned && op == Operation::Hide {
        return None;
    }
    let effect = match op {
        Operation::Pin => OperationEffect {
            pin: PinState::Pinned,
            show,
            tag_rels: None,
        },
        Operation::Unpin => OperationEffect {
            pin: PinState::Unpinned,
            show,
            tag_rels: None,
        },
        Operation::Hide => OperationEffect {
            pin,
            show: ShowState::Hidden,
            tag_rels: Some(TagRelStatus::Hidden),
        },
        Operation::Show => OperationEffect {
            pin,
            show: ShowState::Shown,
            tag_rels: Some(TagRelStatus::Available),
        },
    };
    Some(effect)
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Outcome of a requested status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Write the new status and record the activity.
    Apply(ContentStatus, ActivityAction),
    /// Already in the target state; nothing to do.
    NoOp,
}

/// Close an item. Only available items can be closed.
pub fn close(current: ContentStatus) -> Result<Transition, CoreError> {
    match current {
        ContentStatus::Available => Ok(Transition::Apply(
            ContentStatus::Closed,
            ActivityAction::Closed,
        )),
        ContentStatus::Closed => Ok(Transition::NoOp),
        other => Err(CoreError::Validation(format!(
            "Cannot close an item that is {}",
            other.as_str()
        ))),
    }
}

/// Reopen a closed item.
pub fn reopen(current: ContentStatus) -> Result<Transition, CoreError> {
    match current {
        ContentStatus::Closed => Ok(Transition::Apply(
            ContentStatus::Available,
            ActivityAction::Reopened,
        )),
        ContentStatus::Available => Ok(Transition::NoOp),
        other => Err(CoreError::Validation(format!(
            "Cannot reopen an item that is {}",
            other.as_str()
        ))),
    }
}

/// Soft-delete. Deleting a deleted item is a no-op.
pub fn delete(current: ContentStatus) -> Transition {
    match current {
        ContentStatus::Deleted => Transition::NoOp,
        _ => Transition::Apply(ContentStatus::Deleted, ActivityAction::Deleted),
    }
}

/// Recover a deleted item. Recovering anything else is a no-op.
pub fn recover(current: ContentStatus) -> Transition {
    match current {
        ContentStatus::Deleted => {
            Transition::Apply(ContentStatus::Available, ActivityAction::Undeleted)
        }
        _ => Transition::NoOp,
    }
}

/// Activity recorded when an admin forces `from -> to`. Approving a pending
/// item records nothing.
pub fn admin_status_activity(from: ContentStatus, to: ContentStatus) -> Option<ActivityAction> {
    match (from, to) {
        (ContentStatus::Deleted, ContentStatus::Deleted) => None,
        (_, ContentStatus::Deleted) => Some(ActivityAction::Deleted),
        (ContentStatus::Closed, ContentStatus::Available) => Some(ActivityAction::Reopened),
        (ContentStatus::Deleted, ContentStatus::Available) => Some(ActivityAction::Undeleted),
        (from, ContentStatus::Closed) if from != ContentStatus::Closed => {
            Some(ActivityAction::Closed)
        }
        _ => None,
    }
}

/// Tag relation status that follows an admin status change, if any.
/// Restored relations of a hidden item stay hidden.
pub fn admin_status_tag_rels(
    from: ContentStatus,
    to: ContentStatus,
    show: ShowState,
) -> Option<TagRelStatus> {
    match (from, to) {
        (f, ContentStatus::Deleted) if f != ContentStatus::Deleted => Some(TagRelStatus::Deleted),
        (ContentStatus::Deleted, t) if t != ContentStatus::Deleted => {
            Some(TagRelStatus::live_for(show))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
