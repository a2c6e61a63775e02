//! Editing model for key/value list fields on the metric and metric
//! template forms.
//!
//! A [`KvFieldEditor`] owns the rows of one field and decides, per row,
//! whether the key and value may be changed and whether the row may be
//! removed. The rules depend on the field, the metric type and the form
//! mode.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::record::{KeyValue, Record};
use crate::schema::{FieldDef, FieldKind, CONFIG_FIELD, FLAGS_FIELD};

/// Config key whose value is fixed on existing metrics.
pub const PATH_KEY: &str = "path";

/// Flag that marks a passive metric and can never be edited away.
pub const PASSIVE_FLAG: &str = "PASSIVE";

pub const REQUIRED: &str = "Required";

/// Metric type as far as form rules are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Active,
    Passive,
}

impl MetricKind {
    /// Anything other than `Passive` is treated as active.
    pub fn from_mtype(mtype: &str) -> Self {
        if mtype == "Passive" {
            Self::Passive
        } else {
            Self::Active
        }
    }
}

/// How the form was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormMode {
    /// Rows may be added and keys edited (templates, new metrics).
    pub add_new: bool,
    /// Every value is read-only (history views, unauthorized users).
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KvRow {
    pub key: String,
    pub value: String,
    /// Added during this edit session.
    pub is_new: bool,
}

impl KvRow {
    fn blank(is_new: bool) -> Self {
        Self {
            is_new,
            ..Default::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

/// What may be done with one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowAccess {
    pub key_editable: bool,
    pub value_editable: bool,
    pub removable: bool,
}

/// Renderable state of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvFieldView {
    pub field: String,
    pub hidden: bool,
    pub can_add_rows: bool,
    pub rows: Vec<KvRowView>,
    /// Row index to error message.
    pub errors: BTreeMap<usize, &'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvRowView {
    #[serde(flatten)]
    pub row: KvRow,
    #[serde(flatten)]
    pub access: RowAccess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvFieldEditor {
    field: String,
    kind: MetricKind,
    mode: FormMode,
    rows: Vec<KvRow>,
}

impl KvFieldEditor {
    /// Start editing `pairs`. An empty field starts with one blank row.
    pub fn new(field: &str, kind: MetricKind, mode: FormMode, pairs: &[KeyValue]) -> Self {
        let mut rows: Vec<KvRow> = pairs
            .iter()
            .map(|p| KvRow {
                key: p.key.clone(),
                value: p.value.clone(),
                is_new: false,
            })
            .collect();
        if rows.is_empty() {
            rows.push(KvRow::blank(false));
        }
        Self {
            field: field.to_string(),
            kind,
            mode,
            rows,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn rows(&self) -> &[KvRow] {
        &self.rows
    }

    fn is_config(&self) -> bool {
        self.field == CONFIG_FIELD
    }

    fn is_locked_flag(&self, row: &KvRow) -> bool {
        self.kind == MetricKind::Passive && row.key == PASSIVE_FLAG
    }

    /// Passive metrics show only their flags.
    pub fn is_hidden(&self) -> bool {
        self.kind == MetricKind::Passive && self.field != FLAGS_FIELD
    }

    /// Config keys are fixed; other fields grow only in add-new mode.
    pub fn can_add_rows(&self) -> bool {
        self.mode.add_new && !self.is_config() && !self.is_hidden()
    }

    pub fn row_access(&self, index: usize) -> Option<RowAccess> {
        let row = self.rows.get(index)?;
        let locked = self.is_locked_flag(row);
        let fixed_path = self.is_config() && row.key == PATH_KEY;

        let key_editable = self.mode.add_new && !self.is_config() && !locked;
        let value_editable = if self.kind == MetricKind::Active && self.is_config() {
            !self.mode.read_only && !(!self.mode.add_new && fixed_path)
        } else {
            !self.mode.read_only
                && !(!self.mode.add_new && (!self.is_config() || fixed_path))
                && !locked
        };

        let first_blank = self.rows.first().is_some_and(KvRow::is_blank);
        let passive_flags_guard = self.field == FLAGS_FIELD
            && self.kind == MetricKind::Passive
            && (locked || row.is_blank());
        let removable = self.can_add_rows() && !first_blank && !passive_flags_guard;

        Some(RowAccess {
            key_editable,
            value_editable,
            removable,
        })
    }

    fn access(&self, index: usize) -> Result<RowAccess, CoreError> {
        self.row_access(index).ok_or_else(|| CoreError::NotFound {
            entity: "row",
            id: index.to_string(),
        })
    }

    /// Append a blank row marked as new.
    pub fn add_row(&mut self) -> Result<usize, CoreError> {
        if !self.can_add_rows() {
            return Err(CoreError::Validation(format!(
                "Rows cannot be added to '{}'",
                self.field
            )));
        }
        self.rows.push(KvRow::blank(true));
        Ok(self.rows.len() - 1)
    }

    /// Remove a row. Removing the last remaining row leaves one blank row.
    pub fn remove_row(&mut self, index: usize) -> Result<KvRow, CoreError> {
        if !self.access(index)?.removable {
            return Err(CoreError::Validation(format!(
                "Row {index} of '{}' cannot be removed",
                self.field
            )));
        }
        let removed = self.rows.remove(index);
        if self.rows.is_empty() {
            self.rows.push(KvRow::blank(false));
        }
        Ok(removed)
    }

    pub fn set_key(&mut self, index: usize, key: &str) -> Result<(), CoreError> {
        if !self.access(index)?.key_editable {
            return Err(CoreError::Validation(format!(
                "Key of row {index} in '{}' is read-only",
                self.field
            )));
        }
        self.rows[index].key = key.to_string();
        Ok(())
    }

    pub fn set_value(&mut self, index: usize, value: &str) -> Result<(), CoreError> {
        if !self.access(index)?.value_editable {
            return Err(CoreError::Validation(format!(
                "Value of row {index} in '{}' is read-only",
                self.field
            )));
        }
        self.rows[index].value = value.to_string();
        Ok(())
    }

    /// Per-row errors; only active config rows are validated.
    pub fn validate(&self) -> BTreeMap<usize, &'static str> {
        if self.kind != MetricKind::Active || !self.is_config() {
            return BTreeMap::new();
        }
        validate_config(&self.rows)
    }

    pub fn view(&self) -> KvFieldView {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                Some(KvRowView {
                    row: row.clone(),
                    access: self.row_access(i)?,
                })
            })
            .collect();
        KvFieldView {
            field: self.field.clone(),
            hidden: self.is_hidden(),
            can_add_rows: self.can_add_rows(),
            rows,
            errors: self.validate(),
        }
    }

    /// Final pairs, fully blank rows dropped.
    pub fn into_pairs(self) -> Vec<KeyValue> {
        self.rows
            .into_iter()
            .filter(|r| !r.is_blank())
            .map(|r| KeyValue::new(r.key, r.value))
            .collect()
    }
}

/// Views of every key/value list field of `record`, in schema order.
pub fn field_forms(schema: &[FieldDef], record: &Record, mode: FormMode) -> Vec<KvFieldView> {
    let kind = MetricKind::from_mtype(&record.display("mtype"));
    schema
        .iter()
        .filter(|def| def.kind == FieldKind::List)
        .map(|def| {
            let pairs = record.pairs(def.name).unwrap_or_default();
            KvFieldEditor::new(def.name, kind, mode, pairs).view()
        })
        .collect()
}

/// Every config value of an active metric is required.
pub fn validate_config(rows: &[KvRow]) -> BTreeMap<usize, &'static str> {
    rows.iter()
        .enumerate()
        .filter(|(_, r)| r.value.trim().is_empty())
        .map(|(i, _)| (i, REQUIRED))
        .collect()
}
