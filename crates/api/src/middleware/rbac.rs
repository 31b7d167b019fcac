//! Role-based access control extractors.

use answer_core::error::CoreError;
use answer_core::roles::is_staff;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` or `moderator` role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn moderation(RequireStaff(user): RequireStaff) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_staff(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or moderator role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
