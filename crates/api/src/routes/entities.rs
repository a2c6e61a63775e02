//! Route definitions for entity lists, details, history and import.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{entities, history, import};
use crate::state::AppState;

/// Entity routes mounted at the API root.
///
/// ```text
/// GET  /{entity}                                  -> list_records
/// POST /actions/{entity}/selection                -> update_selection
/// POST /actions/{entity}/import                   -> import_templates
/// GET  /{entity}/{name}                           -> get_record
/// GET  /{entity}/{name}/compare/{other}           -> compare
/// GET  /{entity}/{name}/history                   -> list_history
/// GET  /{entity}/{name}/history/{v1}/{v2}         -> compare_versions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{entity}", get(entities::list_records))
        .route(
            "/actions/{entity}/selection",
            post(entities::update_selection),
        )
        .route("/actions/{entity}/import", post(import::import_templates))
        .route("/{entity}/{name}", get(entities::get_record))
        .route("/{entity}/{name}/compare/{other}", get(entities::compare))
        .route("/{entity}/{name}/history", get(history::list_history))
        .route(
            "/{entity}/{name}/history/{v1}/{v2}",
            get(history::compare_versions),
        )
}
