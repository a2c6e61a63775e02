//! Filterable, paginated tabular list used by every entity list view.
//!
//! A [`TabularList`] holds one immutable snapshot of records plus the
//! per-column filter state, an optional sort, the active page and (for bulk
//! import views) the row selection. Every read recomputes the visible rows
//! from scratch; nothing is cached between calls.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::selection::{SelectionIndicator, SelectionState};
use crate::types::RecordId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Rows per page unless the caller configures otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound for caller-provided page sizes.
pub const MAX_PAGE_SIZE: usize = 500;

/// Clamp a caller-provided page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(page_size: Option<usize>, default: usize) -> usize {
    page_size.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Typed extractor bound to a column when the column set is defined.
pub type Extractor<R> = fn(&R) -> String;

/// How a column can be filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FilterKind {
    None,
    FreeText,
    Dropdown { options: Vec<String> },
}

/// One rendered column.
pub struct Column<R> {
    pub id: &'static str,
    pub header: &'static str,
    pub extract: Extractor<R>,
    pub filter: FilterKind,
    pub sortable: bool,
}

impl<R> Column<R> {
    pub fn free_text(id: &'static str, header: &'static str, extract: Extractor<R>) -> Self {
        Self {
            id,
            header,
            extract,
            filter: FilterKind::FreeText,
            sortable: true,
        }
    }

    pub fn dropdown(
        id: &'static str,
        header: &'static str,
        extract: Extractor<R>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id,
            header,
            extract,
            filter: FilterKind::Dropdown { options },
            sortable: true,
        }
    }

    pub fn plain(id: &'static str, header: &'static str, extract: Extractor<R>) -> Self {
        Self {
            id,
            header,
            extract,
            filter: FilterKind::None,
            sortable: true,
        }
    }
}

/// Serializable description of a column for renderers.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub id: &'static str,
    pub header: &'static str,
    pub filter: FilterKind,
    pub sortable: bool,
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Dropdown selection. `NotSelected` is the placeholder and filters nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropdownChoice {
    NotSelected,
    Selected(String),
}

/// Current filter value of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    Choice(DropdownChoice),
}

impl FilterValue {
    pub fn is_active(&self) -> bool {
        match self {
            Self::Text(t) => !t.is_empty(),
            Self::Choice(c) => matches!(c, DropdownChoice::Selected(_)),
        }
    }
}

/// Column id to filter value. Only active filters are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.values.get(column)
    }

    pub fn active_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set(&mut self, column: &str, value: FilterValue) {
        if value.is_active() {
            self.values.insert(column.to_string(), value);
        } else {
            self.values.remove(column);
        }
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Active sort: column id and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub descending: bool,
}

enum Matcher<'a> {
    Contains(String),
    Exact(&'a str),
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Whether the list has data yet, and whether anything survived filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    /// No snapshot has been loaded.
    Loading,
    /// A snapshot is loaded but no row is visible.
    Empty,
    Ready,
}

/// One row of the current page.
#[derive(Debug, Clone, Serialize)]
pub struct ListRow<R> {
    /// 1-based position among the visible rows.
    pub number: usize,
    pub id: RecordId,
    /// Extracted display value per column, in column order.
    pub cells: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    pub record: R,
}

/// Everything a paginated-table renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct ListViewModel<R> {
    pub status: ListStatus,
    pub columns: Vec<ColumnInfo>,
    pub filters: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    pub rows: Vec<ListRow<R>>,
    /// 0-based index of the active page.
    pub current_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub visible_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionIndicator>,
}

// ---------------------------------------------------------------------------
// Tabular list
// ---------------------------------------------------------------------------

pub struct TabularList<R> {
    records: Option<Vec<R>>,
    columns: Vec<Column<R>>,
    id_of: Extractor<R>,
    filters: FilterState,
    sort: Option<SortSpec>,
    selection: Option<SelectionState>,
    page: usize,
    page_size: usize,
}

impl<R> TabularList<R> {
    /// A list in the loading state.
    pub fn new(columns: Vec<Column<R>>, id_of: Extractor<R>) -> Self {
        Self {
            records: None,
            columns,
            id_of,
            filters: FilterState::default(),
            sort: None,
            selection: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Enable row selection for bulk actions.
    pub fn with_selection(mut self) -> Self {
        self.selection = Some(SelectionState::new());
        self
    }

    /// Replace the snapshot. Filters, sort, page and selection start over.
    pub fn load(&mut self, records: Vec<R>) {
        self.records = Some(records);
        self.filters.clear();
        self.sort = None;
        self.page = 0;
        if let Some(selection) = self.selection.as_mut() {
            selection.clear();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.records.is_none()
    }

    pub fn records(&self) -> Option<&[R]> {
        self.records.as_deref()
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    fn column(&self, id: &str) -> Result<&Column<R>, CoreError> {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::Validation(format!("Unknown column '{id}'")))
    }

    // -- filtering -----------------------------------------------------------

    /// Set the filter of exactly one column and go back to the first page.
    pub fn set_filter(&mut self, column: &str, value: FilterValue) -> Result<(), CoreError> {
        let col = self.column(column)?;
        match (&col.filter, &value) {
            (FilterKind::FreeText, FilterValue::Text(_))
            | (FilterKind::Dropdown { .. }, FilterValue::Choice(_)) => {}
            (FilterKind::None, _) => {
                return Err(CoreError::Validation(format!(
                    "Column '{column}' is not filterable"
                )));
            }
            _ => {
                return Err(CoreError::Validation(format!(
                    "Filter value does not match the filter type of column '{column}'"
                )));
            }
        }
        self.filters.set(column, value);
        self.page = 0;
        Ok(())
    }

    /// Set a filter from raw text, interpreted per the column's filter kind.
    ///
    /// For dropdown columns an empty string is the placeholder.
    pub fn set_filter_text(&mut self, column: &str, raw: &str) -> Result<(), CoreError> {
        let value = match self.column(column)?.filter {
            FilterKind::Dropdown { .. } if raw.is_empty() => {
                FilterValue::Choice(DropdownChoice::NotSelected)
            }
            FilterKind::Dropdown { .. } => {
                FilterValue::Choice(DropdownChoice::Selected(raw.to_string()))
            }
            _ => FilterValue::Text(raw.to_string()),
        };
        self.set_filter(column, value)
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.filters.set(column, FilterValue::Text(String::new()));
        self.page = 0;
    }

    /// Set or clear the sort, going back to the first page.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Result<(), CoreError> {
        if let Some(spec) = &sort {
            let col = self.column(&spec.column)?;
            if !col.sortable {
                return Err(CoreError::Validation(format!(
                    "Column '{}' is not sortable",
                    spec.column
                )));
            }
        }
        self.sort = sort;
        self.page = 0;
        Ok(())
    }

    fn matchers(&self) -> Vec<(Extractor<R>, Matcher<'_>)> {
        self.columns
            .iter()
            .filter_map(|col| {
                let matcher = match self.filters.get(col.id)? {
                    FilterValue::Text(t) if !t.is_empty() => Matcher::Contains(t.to_lowercase()),
                    FilterValue::Choice(DropdownChoice::Selected(opt)) => Matcher::Exact(opt),
                    _ => return None,
                };
                Some((col.extract, matcher))
            })
            .collect()
    }

    /// Rows passing every active filter, in collection order.
    ///
    /// Empty while loading.
    pub fn filtered(&self) -> impl Iterator<Item = &R> + '_ {
        let matchers = self.matchers();
        self.records
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(move |row| {
                matchers.iter().all(|(extract, matcher)| {
                    let cell = extract(row);
                    match matcher {
                        Matcher::Contains(needle) => cell.to_lowercase().contains(needle.as_str()),
                        Matcher::Exact(option) => cell == *option,
                    }
                })
            })
    }

    /// Filtered rows with the active sort applied.
    pub fn visible_rows(&self) -> Vec<&R> {
        let mut rows: Vec<&R> = self.filtered().collect();
        if let Some(spec) = &self.sort {
            if let Ok(col) = self.column(&spec.column) {
                let extract = col.extract;
                if spec.descending {
                    rows.sort_by_cached_key(|r| Reverse(extract(r).to_lowercase()));
                } else {
                    rows.sort_by_cached_key(|r| extract(r).to_lowercase());
                }
            }
        }
        rows
    }

    fn visible_ids(&self) -> Vec<RecordId> {
        self.filtered().map(|r| (self.id_of)(r)).collect()
    }

    // -- pagination ----------------------------------------------------------

    /// Number of pages for the visible rows; at least one once loaded.
    pub fn page_count(&self) -> usize {
        if self.is_loading() {
            return 0;
        }
        let visible = self.filtered().count();
        visible.div_ceil(self.page_size).max(1)
    }

    /// Move to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        let last = self.page_count().saturating_sub(1);
        self.page = page.min(last);
    }

    /// Rows of the active page with their 1-based visible position.
    pub fn page_rows(&self) -> Vec<(usize, &R)> {
        self.visible_rows()
            .into_iter()
            .enumerate()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|(i, r)| (i + 1, r))
            .collect()
    }

    // -- selection -----------------------------------------------------------

    fn selection_mut(&mut self) -> Result<&mut SelectionState, CoreError> {
        self.selection
            .as_mut()
            .ok_or_else(|| CoreError::Validation("Selection is not enabled for this list".into()))
    }

    /// Flip one record's selection and recompute the indicator over the
    /// visible rows.
    pub fn toggle_row_selection(&mut self, id: &str) -> Result<SelectionIndicator, CoreError> {
        let known = self
            .records
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|r| (self.id_of)(r) == id);
        if !known {
            return Err(CoreError::NotFound {
                entity: "row",
                id: id.to_string(),
            });
        }
        let visible = self.visible_ids();
        let selection = self.selection_mut()?;
        selection.toggle(id);
        Ok(selection.indicator(&as_strs(&visible)))
    }

    /// Select or deselect every visible row; hidden rows keep their state.
    pub fn toggle_select_all(&mut self) -> Result<SelectionIndicator, CoreError> {
        let visible = self.visible_ids();
        let selection = self.selection_mut()?;
        Ok(selection.toggle_all(&as_strs(&visible)))
    }

    /// Indicator over the visible rows, `None` when selection is disabled.
    pub fn selection_indicator(&self) -> Option<SelectionIndicator> {
        let selection = self.selection.as_ref()?;
        let visible = self.visible_ids();
        Some(selection.indicator(&as_strs(&visible)))
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    /// Replace the selection flags, e.g. with state echoed back by a client.
    pub fn restore_selection(&mut self, state: SelectionState) -> Result<(), CoreError> {
        *self.selection_mut()? = state;
        Ok(())
    }

    /// Selected identifiers across the whole snapshot, in collection order.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        let Some(selection) = self.selection.as_ref() else {
            return Vec::new();
        };
        let ids: Vec<RecordId> = self
            .records
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|r| (self.id_of)(r))
            .collect();
        selection.selected_in(ids.iter().map(String::as_str))
    }

    // -- view model ----------------------------------------------------------

    pub fn column_info(&self) -> Vec<ColumnInfo> {
        self.columns
            .iter()
            .map(|c| ColumnInfo {
                id: c.id,
                header: c.header,
                filter: c.filter.clone(),
                sortable: c.sortable,
            })
            .collect()
    }

    pub fn view_model(&self) -> ListViewModel<R>
    where
        R: Clone,
    {
        let visible_rows = self.filtered().count();
        let status = match (&self.records, visible_rows) {
            (None, _) => ListStatus::Loading,
            (Some(_), 0) => ListStatus::Empty,
            (Some(_), _) => ListStatus::Ready,
        };
        let rows = self
            .page_rows()
            .into_iter()
            .map(|(number, record)| {
                let id = (self.id_of)(record);
                ListRow {
                    number,
                    cells: self.columns.iter().map(|c| (c.extract)(record)).collect(),
                    selected: self.selection.as_ref().map(|s| s.is_selected(&id)),
                    id,
                    record: record.clone(),
                }
            })
            .collect();

        ListViewModel {
            status,
            columns: self.column_info(),
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            rows,
            current_page: self.page,
            page_count: self.page_count(),
            page_size: self.page_size,
            total_rows: self.records.as_ref().map_or(0, Vec::len),
            visible_rows,
            selection: self.selection_indicator(),
        }
    }
}

fn as_strs(ids: &[RecordId]) -> Vec<&str> {
    ids.iter().map(String::as_str).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
