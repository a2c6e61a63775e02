//! Row selection for bulk-action list views.
//!
//! Selection is keyed by stable record identifier so that filtering or
//! reordering rows can never detach a checkbox from its record. The
//! aggregate indicator is always computed against the rows the caller says
//! are visible.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// Tri-state "select all" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionIndicator {
    NoneSelected,
    AllSelected,
    Mixed,
}

/// Per-record selected flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    selected: HashMap<RecordId, bool>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(selected: HashMap<RecordId, bool>) -> Self {
        Self { selected }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: &str, value: bool) {
        self.selected.insert(id.to_string(), value);
    }

    /// Flip one record's flag and return the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_selected(id);
        self.set(id, next);
        next
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Aggregate state over `visible`. No visible rows counts as none selected.
    pub fn indicator(&self, visible: &[&str]) -> SelectionIndicator {
        let selected = visible.iter().filter(|id| self.is_selected(id)).count();
        if selected == 0 {
            SelectionIndicator::NoneSelected
        } else if selected == visible.len() {
            SelectionIndicator::AllSelected
        } else {
            SelectionIndicator::Mixed
        }
    }

    /// Select every visible row when none is selected, otherwise deselect
    /// every visible row. Rows outside `visible` are left untouched.
    pub fn toggle_all(&mut self, visible: &[&str]) -> SelectionIndicator {
        let select = self.indicator(visible) == SelectionIndicator::NoneSelected;
        for id in visible {
            self.set(id, select);
        }
        self.indicator(visible)
    }

    /// Selected identifiers among `ids`, keeping the order of `ids`.
    pub fn selected_in<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Vec<RecordId> {
        ids.into_iter()
            .filter(|id| self.is_selected(id))
            .map(str::to_string)
            .collect()
    }
}
