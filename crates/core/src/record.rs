//! The record model: an immutable snapshot of one configuration entity.
//!
//! A record maps field names to either a scalar string or an ordered list of
//! key/value pairs (metric config, attributes, flags and friends). The
//! backend delivers records as loose JSON; [`Record::from_json`] turns that
//! into the typed form the differ and the list operate on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// One entry of a key/value list field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The value held by a single record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    Pairs(Vec<KeyValue>),
}

impl FieldValue {
    /// Plain-string rendering used for filtering and text output.
    ///
    /// Pairs render as `key=value` joined with `, `.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Scalar(s) => s.clone(),
            Self::Pairs(pairs) => pairs
                .iter()
                .map(|kv| format!("{}={}", kv.key, kv.value))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A snapshot of one entity. Absent fields are distinct from empty ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a scalar field.
    pub fn with_scalar(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), FieldValue::Scalar(value.into()));
        self
    }

    /// Builder-style insert of a key/value list field.
    pub fn with_pairs<K, V>(mut self, name: &str, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs = pairs
            .iter()
            .map(|(k, v)| KeyValue::new(k.as_ref(), v.as_ref()))
            .collect();
        self.fields.insert(name.to_string(), FieldValue::Pairs(pairs));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The scalar value of `name`, or `None` when absent or not a scalar.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// The pair list of `name`, or `None` when absent or not a list.
    pub fn pairs(&self, name: &str) -> Option<&[KeyValue]> {
        match self.fields.get(name) {
            Some(FieldValue::Pairs(p)) => Some(p),
            _ => None,
        }
    }

    /// Plain-string rendering of a field; absent fields render as `""`.
    pub fn display(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(FieldValue::to_plain_string)
            .unwrap_or_default()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert a backend JSON object into a record.
    ///
    /// - strings stay scalars; numbers and booleans are stringified
    /// - `null` means the field is absent
    /// - arrays whose elements are all `{ "key": .., "value": .. }` objects
    ///   become pair lists (an empty array is an empty pair list)
    /// - any other array or object is kept as a scalar holding compact JSON
    pub fn from_json(value: &Value) -> Result<Self, CoreError> {
        let obj = value.as_object().ok_or_else(|| {
            CoreError::MalformedRecord(format!("expected a JSON object, got {}", json_kind(value)))
        })?;

        let mut fields = BTreeMap::new();
        for (name, raw) in obj {
            if let Some(field) = field_from_json(raw) {
                fields.insert(name.clone(), field);
            }
        }
        Ok(Self { fields })
    }
}

fn field_from_json(raw: &Value) -> Option<FieldValue> {
    match raw {
        Value::Null => None,
        Value::String(s) => Some(FieldValue::Scalar(s.clone())),
        Value::Number(n) => Some(FieldValue::Scalar(n.to_string())),
        Value::Bool(b) => Some(FieldValue::Scalar(b.to_string())),
        Value::Array(items) => match pairs_from_json(items) {
            Some(pairs) => Some(FieldValue::Pairs(pairs)),
            None => Some(FieldValue::Scalar(raw.to_string())),
        },
        Value::Object(_) => Some(FieldValue::Scalar(raw.to_string())),
    }
}

/// A pair list only when every entry is `{"key": string, "value": string}`.
/// Anything else (a `null` value included) stays JSON text, so it never
/// compares equal to a list holding empty strings.
fn pairs_from_json(items: &[Value]) -> Option<Vec<KeyValue>> {
    items
        .iter()
        .map(|item| {
            let obj = item.as_object()?;
            let key = obj.get("key")?.as_str()?;
            let value = obj.get("value")?.as_str()?;
            Some(KeyValue::new(key, value))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
