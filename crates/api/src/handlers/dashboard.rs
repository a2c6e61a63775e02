//! Handler for the public landing page.

use axum::extract::State;
use axum::response::IntoResponse;
use monconsole_core::tenants::dashboard as build_dashboard;

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// Open to anonymous visitors, who get the same public links as a tenant
/// user. Superusers get the tenant grid; the tenant list is only fetched
/// for them.
pub async fn dashboard(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let is_superuser = user.as_ref().is_some_and(|u| u.ctx.is_superuser);
    let tenants = if is_superuser {
        state.records.fetch_public_tenants().await?
    } else {
        Vec::new()
    };

    Ok(DataResponse::new(build_dashboard(is_superuser, &tenants)))
}
