//! Bulk import of selected metric templates into a tenant.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::RecordId;

/// Body posted to the backend import endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub metrictemplates: Vec<RecordId>,
}

impl ImportRequest {
    /// Build a request from the selected identifiers.
    ///
    /// An empty selection is rejected before anything is sent.
    pub fn new(selected: Vec<RecordId>) -> Result<Self, CoreError> {
        validate_selection(&selected)?;
        Ok(Self {
            metrictemplates: selected,
        })
    }
}

pub fn validate_selection(selected: &[RecordId]) -> Result<(), CoreError> {
    if selected.is_empty() {
        return Err(CoreError::Validation(
            "No metric templates selected for import".into(),
        ));
    }
    Ok(())
}

/// Outcome of an import as reported by the backend.
///
/// The backend answers with an `imported` and an `err` entry, each either a
/// single message or a list of messages. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn from_json(value: &Value) -> Result<Self, CoreError> {
        if !value.is_object() {
            return Err(CoreError::MalformedRecord(
                "import response must be a JSON object".into(),
            ));
        }
        Ok(Self {
            imported: messages(value.get("imported")),
            errors: messages(value.get("err")),
        })
    }

    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn messages(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
