//! Handlers for entity list, selection and detail views.
//!
//! Every endpoint requires authentication via [`AuthUser`]; the bulk
//! selection endpoint additionally requires a superuser.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use monconsole_client::orchestrate::{build_list, compare_records};
use monconsole_core::diff::FieldDiff;
use monconsole_core::history::ProbeVersionRef;
use monconsole_core::kv_editor::{field_forms, FormMode, KvFieldView};
use monconsole_core::listing::{ListViewModel, TabularList};
use monconsole_core::record::Record;
use monconsole_core::schema::EntityType;
use monconsole_core::selection::SelectionState;
use monconsole_core::types::RecordId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ViewParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ListPage {
    pub entity: EntityType,
    /// Whether the user may add records of this type.
    pub can_add: bool,
    #[serde(flatten)]
    pub view: ListViewModel<Record>,
}

#[derive(Debug, Serialize)]
pub struct SelectionPage {
    #[serde(flatten)]
    pub view: ListViewModel<Record>,
    /// Full selection state to echo back with the next request.
    pub selected: SelectionState,
    pub selected_ids: Vec<RecordId>,
}

#[derive(Debug, Serialize)]
pub struct RecordDetail {
    pub entity: EntityType,
    pub name: String,
    pub record: Record,
    /// Whether the user may change or delete this record.
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeVersionRef>,
    /// Key/value list fields with per-row edit rules.
    pub forms: Vec<KvFieldView>,
}

#[derive(Debug, Serialize)]
pub struct RecordComparison {
    pub entity: EntityType,
    pub before: String,
    pub after: String,
    pub changes: Vec<FieldDiff>,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Action applied to the echoed selection.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionAction {
    ToggleRow { id: RecordId },
    ToggleAll,
    /// Recompute the view without changing the selection.
    Refresh,
}

#[derive(Debug, Deserialize)]
pub struct SelectionBody {
    #[serde(default)]
    pub view: ViewParams,
    #[serde(default)]
    pub selected: HashMap<RecordId, bool>,
    pub action: SelectionAction,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_entity(segment: &str) -> AppResult<EntityType> {
    Ok(EntityType::from_path_segment(segment)?)
}

async fn load_view(
    state: &AppState,
    entity: EntityType,
    selectable: bool,
    params: &ViewParams,
) -> AppResult<TabularList<Record>> {
    let page_size = params.page_size(state.config.default_page_size);
    let mut list = build_list(state.records.as_ref(), entity, selectable, page_size).await?;
    params.apply(&mut list)?;
    Ok(list)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/{entity}
///
/// Filter, sort and page come from the query string. Metric template lists
/// carry a selection column for superusers.
pub async fn list_records(
    user: AuthUser,
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let entity = parse_entity(&entity)?;
    let params = ViewParams::from_query(query)?;
    let selectable = entity == EntityType::MetricTemplate && user.ctx.can_import();

    let list = load_view(&state, entity, selectable, &params).await?;
    let view = list.view_model();
    tracing::debug!(
        entity = %entity,
        total = view.total_rows,
        visible = view.visible_rows,
        "Built list view"
    );

    Ok(DataResponse::new(ListPage {
        entity,
        can_add: user.ctx.can_add(entity),
        view,
    }))
}

/// POST /api/v1/actions/{entity}/selection
///
/// Applies one selection action to the selection the client echoes back and
/// returns the recomputed view. Only metric templates are selectable.
pub async fn update_selection(
    user: AuthUser,
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(body): Json<SelectionBody>,
) -> AppResult<impl IntoResponse> {
    let entity = parse_entity(&entity)?;
    if entity != EntityType::MetricTemplate {
        return Err(AppError::BadRequest(format!(
            "{} lists do not support selection",
            entity.label()
        )));
    }
    user.ctx.require_superuser()?;

    let mut list = load_view(&state, entity, true, &body.view).await?;
    list.restore_selection(SelectionState::from_map(body.selected))?;
    match body.action {
        SelectionAction::ToggleRow { id } => {
            list.toggle_row_selection(&id)?;
        }
        SelectionAction::ToggleAll => {
            list.toggle_select_all()?;
        }
        SelectionAction::Refresh => {}
    }

    Ok(DataResponse::new(SelectionPage {
        view: list.view_model(),
        selected: list.selection().cloned().unwrap_or_default(),
        selected_ids: list.selected_ids(),
    }))
}

/// GET /api/v1/{entity}/{name}
pub async fn get_record(
    user: AuthUser,
    State(state): State<AppState>,
    Path((entity, name)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let entity = parse_entity(&entity)?;
    let record = state.records.fetch_one(entity, &name).await?;

    let group = entity.group_field().and_then(|f| record.scalar(f));
    let editable = user.ctx.can_write(entity, group);
    let probe = record.scalar("probeversion").and_then(ProbeVersionRef::parse);

    let forms = match entity {
        EntityType::Metric | EntityType::MetricTemplate => {
            let mode = FormMode {
                add_new: entity == EntityType::MetricTemplate && user.ctx.is_superuser,
                read_only: !editable,
            };
            field_forms(entity.schema(), &record, mode)
        }
        EntityType::Probe | EntityType::AggregationProfile => Vec::new(),
    };

    Ok(DataResponse::new(RecordDetail {
        entity,
        name,
        record,
        editable,
        probe,
        forms,
    }))
}

/// GET /api/v1/{entity}/{name}/compare/{other}
///
/// Field-by-field differences from `name` to `other`.
pub async fn compare(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((entity, name, other)): Path<(String, String, String)>,
) -> AppResult<impl IntoResponse> {
    let entity = parse_entity(&entity)?;
    let changes = compare_records(state.records.as_ref(), entity, &name, &other).await?;

    Ok(DataResponse::new(RecordComparison {
        entity,
        before: name,
        after: other,
        changes,
    }))
}
