//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use monconsole_client::ApiError;
use monconsole_core::error::CoreError;
use monconsole_core::permissions::AuthContext;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated session resolved from the `Authorization: Bearer` header.
///
/// The token is handed to the configured
/// [`IdentityProvider`](monconsole_client::IdentityProvider); nothing is
/// validated locally.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(username = %user.ctx.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub ctx: AuthContext,
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

        let ctx = state
            .identity
            .resolve(token)
            .await
            .map_err(rejection)?;

        Ok(AuthUser { ctx })
    }
}

/// Session for endpoints that also serve anonymous visitors.
///
/// No `Authorization` header yields `None`; a header that is present must
/// still resolve, so a stale token is reported rather than ignored.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(MaybeAuthUser(None));
        }
        AuthUser::from_request_parts(parts, state)
            .await
            .map(|user| MaybeAuthUser(Some(user)))
    }
}

/// Backend refusals of the token are the caller's problem, not the backend's.
fn rejection(err: ApiError) -> AppError {
    match err {
        ApiError::Status {
            status: 401 | 403, ..
        } => AppError::Core(CoreError::Unauthorized("Invalid or expired session".into())),
        ApiError::Decode(CoreError::Unauthorized(msg)) => {
            AppError::Core(CoreError::Unauthorized(msg))
        }
        other => AppError::Upstream(other),
    }
}
