//! The requesting user as the permission layer sees them.
//!
//! Tokens only carry a claimed role; rank and role are always re-read from
//! the `users` row so a demotion takes effect immediately.

use answer_core::error::CoreError;
use answer_core::permission::{Actor, ContentPermission};
use answer_core::types::DbId;
use answer_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Requester {
    pub user_id: DbId,
    pub role: String,
    pub rank: i32,
}

impl Requester {
    /// Load the user behind a validated token.
    pub async fn load(pool: &PgPool, user_id: DbId) -> AppResult<Self> {
        let user = UserRepo::find_by_id(pool, user_id).await?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
        })?;
        Ok(Self {
            user_id: user.id,
            role: user.role,
            rank: user.rank,
        })
    }

    /// Like [`Requester::load`] for endpoints that also serve anonymous
    /// readers.
    pub async fn load_optional(pool: &PgPool, user_id: Option<DbId>) -> AppResult<Option<Self>> {
        match user_id {
            Some(id) => Ok(Some(Self::load(pool, id).await?)),
            None => Ok(None),
        }
    }

    pub fn actor(&self) -> Actor<'_> {
        Actor {
            user_id: self.user_id,
            role: &self.role,
            rank: self.rank,
        }
    }

    pub fn permission(&self) -> ContentPermission {
        ContentPermission::resolve(Some(&self.actor()))
    }

    pub fn is_staff(&self) -> bool {
        self.actor().is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.actor().is_admin()
    }
}

/// Capabilities of an optional requester; anonymous readers get none.
pub fn permission_of(requester: Option<&Requester>) -> ContentPermission {
    match requester {
        Some(r) => r.permission(),
        None => ContentPermission::default(),
    }
}
