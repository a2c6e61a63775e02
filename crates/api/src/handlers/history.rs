//! Handlers for version history and revision comparison.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use monconsole_client::orchestrate::compare_history_versions;
use monconsole_core::history::{default_compare_pair, VersionSummary};
use monconsole_core::schema::EntityType;
use serde::Serialize;

use super::entities::parse_entity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ComparePair {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub entity: EntityType,
    pub name: String,
    /// Newest first.
    pub versions: Vec<VersionSummary>,
    /// Revisions a compare view preselects: previous against newest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_compare: Option<ComparePair>,
}

/// GET /api/v1/{entity}/{name}/history
pub async fn list_history(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((entity, name)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let entity = parse_entity(&entity)?;
    let history = state.records.fetch_version_history(entity, &name).await?;

    let default_compare = default_compare_pair(&history).map(|(newest, previous)| ComparePair {
        before: previous.to_string(),
        after: newest.to_string(),
    });
    let versions = history.iter().map(|entry| entry.summary()).collect();

    Ok(DataResponse::new(HistoryPage {
        entity,
        name,
        versions,
        default_compare,
    }))
}

/// GET /api/v1/{entity}/{name}/history/{v1}/{v2}
///
/// Differences from revision `v1` to revision `v2`.
pub async fn compare_versions(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((entity, name, v1, v2)): Path<(String, String, String, String)>,
) -> AppResult<impl IntoResponse> {
    let entity = parse_entity(&entity)?;
    let comparison =
        compare_history_versions(state.records.as_ref(), entity, &name, &v1, &v2).await?;
    tracing::debug!(
        entity = %entity,
        name = %name,
        changed = comparison.changes.len(),
        "Compared revisions"
    );

    Ok(DataResponse::new(comparison))
}
