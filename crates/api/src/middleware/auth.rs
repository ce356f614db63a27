//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use surveytrack_core::error::CoreError;
use surveytrack_core::roles::{RequestingUser, Role};
use surveytrack_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved from the Bearer token's subject and the
/// stored profile.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = user.role.as_str(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's profile id (from `claims.sub`).
    pub user_id: DbId,
    /// Role from the stored profile, never from the token.
    pub role: Role,
}

impl AuthUser {
    /// The identity passed to every scoped fetch.
    pub fn requesting_user(&self) -> RequestingUser {
        RequestingUser::new(self.user_id, self.role)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let profile = state.store.fetch_profile(claims.sub).await?.ok_or_else(|| {
            AppError::Core(CoreError::Forbidden("No profile for this account".into()))
        })?;

        Ok(AuthUser {
            user_id: profile.id,
            role: profile.role,
        })
    }
}
