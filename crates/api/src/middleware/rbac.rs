//! Permission extractors layered on [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A session with superuser rights: bulk selection and template import.
///
/// Rejects with 403 for any other valid session.
pub struct RequireSuperuser(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperuser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if let Err(err) = user.ctx.require_superuser() {
            tracing::debug!(
                username = %user.ctx.username,
                path = %parts.uri.path(),
                "Superuser-only endpoint refused"
            );
            return Err(err.into());
        }
        Ok(RequireSuperuser(user))
    }
}
