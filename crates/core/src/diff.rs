//! Field-set differ used by every version compare view.
//!
//! Compares two snapshots of the same entity field by field, in schema
//! order, and keeps only the fields whose values differ. Key/value list
//! fields are compared as ordered sequences and reported whole.

use serde::Serialize;

use crate::record::{FieldValue, KeyValue, Record};
use crate::schema::{FieldDef, FieldKind};

/// One differing field with both of its values.
///
/// `None` means the field is absent from that snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub label: String,
    pub kind: FieldKind,
    pub before: Option<FieldValue>,
    pub after: Option<FieldValue>,
}

/// Compute the differing fields of `before` and `after` under `schema`.
///
/// Scalars compare with exact, case-sensitive equality. Lists compare by
/// length and then index by index. Fields not named in the schema are
/// ignored. When a value's shape disagrees with its schema tag the two
/// values are compared structurally, so a scalar never equals a list.
pub fn diff(schema: &[FieldDef], before: &Record, after: &Record) -> Vec<FieldDiff> {
    schema
        .iter()
        .filter_map(|def| {
            let a = before.get(def.name);
            let b = after.get(def.name);
            if values_equal(def.kind, a, b) {
                return None;
            }
            Some(FieldDiff {
                field: def.name.to_string(),
                label: def.label.to_string(),
                kind: def.kind,
                before: a.cloned(),
                after: b.cloned(),
            })
        })
        .collect()
}

/// Names of the fields that differ, in schema order.
pub fn changed_field_names(
    schema: &[FieldDef],
    before: &Record,
    after: &Record,
) -> Vec<&'static str> {
    schema
        .iter()
        .filter(|def| !values_equal(def.kind, before.get(def.name), after.get(def.name)))
        .map(|def| def.name)
        .collect()
}

fn values_equal(kind: FieldKind, a: Option<&FieldValue>, b: Option<&FieldValue>) -> bool {
    match (kind, a, b) {
        (_, None, None) => true,
        (FieldKind::Scalar, Some(FieldValue::Scalar(x)), Some(FieldValue::Scalar(y))) => x == y,
        (FieldKind::List, Some(FieldValue::Pairs(x)), Some(FieldValue::Pairs(y))) => {
            pairs_equal(x, y)
        }
        (_, a, b) => a == b,
    }
}

/// Ordered comparison: same length and equal key and value at every index.
pub fn pairs_equal(a: &[KeyValue], b: &[KeyValue]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.key == y.key && x.value == y.value)
}
