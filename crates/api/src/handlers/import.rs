//! Handler for bulk metric template import.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use monconsole_core::import::ImportRequest;
use monconsole_core::schema::EntityType;
use monconsole_core::types::RecordId;
use serde::Deserialize;

use super::entities::parse_entity;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperuser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportBody {
    /// Identifiers of the selected templates, as returned in `selected_ids`.
    pub selected: Vec<RecordId>,
}

/// POST /api/v1/actions/{entity}/import
///
/// Submits the selected metric templates for import into the tenant. An
/// empty selection is rejected without contacting the backend.
pub async fn import_templates(
    RequireSuperuser(user): RequireSuperuser,
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(body): Json<ImportBody>,
) -> AppResult<impl IntoResponse> {
    let entity = parse_entity(&entity)?;
    if entity != EntityType::MetricTemplate {
        return Err(AppError::BadRequest(format!(
            "{} records cannot be imported",
            entity.label()
        )));
    }

    let request = ImportRequest::new(body.selected)?;
    let report = state.bulk.submit_selection(&request).await?;

    if report.has_errors() {
        tracing::warn!(
            username = %user.ctx.username,
            errors = ?report.errors,
            "Some metric templates were not imported"
        );
    } else {
        tracing::info!(
            username = %user.ctx.username,
            imported = report.imported_count(),
            "Imported metric templates"
        );
    }

    Ok(DataResponse::new(report))
}
