//! Column sets for the entity list views.
//!
//! Each column binds a plain `fn` extractor at definition time, so filtering
//! never evaluates field paths at runtime.

use crate::listing::{Column, TabularList};
use crate::record::Record;
use crate::schema::EntityType;
use crate::types::RecordId;

/// Dropdown option lists fetched alongside the records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Metric (or metric template) types, e.g. `Active`, `Passive`.
    pub types: Vec<String>,
    /// Groups the current user may see for this entity.
    pub groups: Vec<String>,
}

fn name(r: &Record) -> String {
    r.display("name")
}

fn probeversion(r: &Record) -> String {
    r.display("probeversion")
}

fn mtype(r: &Record) -> String {
    r.display("mtype")
}

fn group(r: &Record) -> String {
    r.display("group")
}

fn version(r: &Record) -> String {
    r.display("version")
}

fn description(r: &Record) -> String {
    r.display("description")
}

fn groupname(r: &Record) -> String {
    r.display("groupname")
}

/// Stable identifier of a record in every list.
pub fn record_id(r: &Record) -> RecordId {
    r.display("name")
}

/// Columns of the list view for `entity`, in render order.
pub fn columns_for(entity: EntityType, options: &ListOptions) -> Vec<Column<Record>> {
    match entity {
        EntityType::Metric => vec![
            Column::free_text("name", "Name", name),
            Column::free_text("probeversion", "Probe version", probeversion),
            Column::dropdown("mtype", "Type", mtype, options.types.clone()),
            Column::dropdown("group", "Group", group, options.groups.clone()),
        ],
        EntityType::MetricTemplate => vec![
            Column::free_text("name", "Name", name),
            Column::free_text("probeversion", "Probe version", probeversion),
            Column::dropdown("mtype", "Type", mtype, options.types.clone()),
        ],
        EntityType::Probe => vec![
            Column::free_text("name", "Name", name),
            Column::free_text("version", "Version", version),
            Column::free_text("description", "Description", description),
        ],
        EntityType::AggregationProfile => vec![
            Column::free_text("name", "Name", name),
            Column::dropdown("groupname", "Group", groupname, options.groups.clone()),
        ],
    }
}

/// A list view for `entity` in the loading state.
///
/// `selectable` enables the bulk-import checkbox column.
pub fn list_for(
    entity: EntityType,
    options: &ListOptions,
    selectable: bool,
    page_size: usize,
) -> TabularList<Record> {
    let list = TabularList::new(columns_for(entity, options), record_id).with_page_size(page_size);
    if selectable {
        list.with_selection()
    } else {
        list
    }
}
