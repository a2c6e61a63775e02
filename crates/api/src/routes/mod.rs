pub mod entities;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard                                   public landing page
///
/// /{entity}                                    list view (metric, metrictemplates,
///                                              probes, aggregations)
/// /actions/{entity}/selection                  selection round-trip (POST)
/// /actions/{entity}/import                     bulk import, metrictemplates only (POST)
/// /{entity}/{name}                             record detail
/// /{entity}/{name}/compare/{other}             diff two records
/// /{entity}/{name}/history                     revision list
/// /{entity}/{name}/history/{v1}/{v2}           diff two revisions
/// ```
///
/// Bulk actions live under `/actions` so no record name can shadow them.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .merge(entities::router())
}
