//! Status helper enums mapping to SMALLINT columns.
//!
//! Discriminants are the values stored in the database and must never be
//! renumbered.

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Map a stored ID back to the enum. Unknown IDs yield `None`.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Lifecycle status of a content item.
    ContentStatus {
        Available = 1,
        Closed = 2,
        Deleted = 10,
        Pending = 11,
    }
}

define_status_enum! {
    /// Pinned items sort ahead of everything else in listings.
    PinState {
        Unpinned = 1,
        Pinned = 2,
    }
}

define_status_enum! {
    /// Visibility of a content item in public listings.
    ShowState {
        Shown = 1,
        Hidden = 2,
    }
}

define_status_enum! {
    /// Status of an object-to-tag relation. Follows the owning item's
    /// visibility and deletion.
    TagRelStatus {
        Available = 1,
        Hidden = 2,
        Deleted = 10,
    }
}

define_status_enum! {
    /// Review status of a stored revision.
    RevisionStatus {
        Unreviewed = 1,
        Passed = 2,
        Rejected = 3,
    }
}

impl ContentStatus {
    /// Statuses visible in public listings and the sitemap.
    pub const LISTED: [ContentStatus; 2] = [ContentStatus::Available, ContentStatus::Closed];

    /// Admin-facing status name.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Available => "available",
            ContentStatus::Closed => "closed",
            ContentStatus::Deleted => "deleted",
            ContentStatus::Pending => "pending",
        }
    }

    /// Parse the admin status filter / status-change payload.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "available" => Ok(ContentStatus::Available),
            "closed" => Ok(ContentStatus::Closed),
            "deleted" => Ok(ContentStatus::Deleted),
            "pending" => Ok(ContentStatus::Pending),
            other => Err(CoreError::field(
                "status",
                format!("Unknown status '{other}'"),
            )),
        }
    }

    /// IDs of [`ContentStatus::LISTED`], optionally including pending.
    pub fn listed_ids(show_pending: bool) -> Vec<StatusId> {
        let mut ids: Vec<StatusId> = Self::LISTED.iter().map(|s| s.id()).collect();
        if show_pending {
            ids.push(ContentStatus::Pending.id());
        }
        ids
    }
}

impl TagRelStatus {
    /// Relation status of a live (not deleted) item with the given
    /// visibility.
    pub fn live_for(show: ShowState) -> Self {
        match show {
            ShowState::Shown => TagRelStatus::Available,
            ShowState::Hidden => TagRelStatus::Hidden,
        }
    }
}
