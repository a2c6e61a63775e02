//! Version history: parsing backend revisions, comparing two of them, and
//! rendering the change comments stored with each revision.

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diff::{diff, FieldDiff};
use crate::error::CoreError;
use crate::record::Record;
use crate::schema::{EntityType, FieldDef};
use crate::types::Timestamp;

/// Comment stored with the first revision of an object.
pub const INITIAL_VERSION_COMMENT: &str = "Initial version.";

// ---------------------------------------------------------------------------
// Version entries
// ---------------------------------------------------------------------------

/// One revision of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionEntry {
    /// Version tag as assigned by the backend.
    pub version: String,
    /// Display representation, e.g. `ams-probe (0.1.7)`.
    pub object_repr: String,
    pub record: Record,
    pub date_created: Option<Timestamp>,
    pub user: String,
    /// Raw comment as stored by the backend.
    pub comment: String,
}

impl VersionEntry {
    /// Parse one entry of a backend history listing.
    ///
    /// The snapshot lives under `fields`; everything else is metadata.
    pub fn from_json(value: &Value) -> Result<Self, CoreError> {
        let fields = value
            .get("fields")
            .ok_or_else(|| CoreError::MalformedRecord("history entry without 'fields'".into()))?;
        let record = Record::from_json(fields)?;

        let version = match value.get("version") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(CoreError::MalformedRecord(
                    "history entry without 'version'".into(),
                ))
            }
        };

        Ok(Self {
            version,
            object_repr: text(value, "object_repr"),
            record,
            date_created: value
                .get("date_created")
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
            user: text(value, "user"),
            comment: text(value, "comment"),
        })
    }

    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            version: self.version.clone(),
            object_repr: self.object_repr.clone(),
            date_created: self.date_created,
            user: self.user.clone(),
            comment: render_change_comment(&self.comment),
        }
    }
}

/// History row without the snapshot, comment already rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version: String,
    pub object_repr: String,
    pub date_created: Option<Timestamp>,
    pub user: String,
    pub comment: String,
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Accept RFC 3339 and the backend's naive `YYYY-MM-DD HH:MM:SS[.f]` (UTC).
fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a backend history listing (a JSON array of revisions).
pub fn parse_history(value: &Value) -> Result<Vec<VersionEntry>, CoreError> {
    value
        .as_array()
        .ok_or_else(|| CoreError::MalformedRecord("history must be a JSON array".into()))?
        .iter()
        .map(VersionEntry::from_json)
        .collect()
}

pub fn find_version<'a>(history: &'a [VersionEntry], version: &str) -> Option<&'a VersionEntry> {
    history.iter().find(|e| e.version == version)
}

/// The pair a compare view preselects: the two most recent revisions.
pub fn default_compare_pair(history: &[VersionEntry]) -> Option<(&str, &str)> {
    match history {
        [newest, previous, ..] => Some((newest.version.as_str(), previous.version.as_str())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Result of comparing two revisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionComparison {
    pub entity: EntityType,
    pub name: String,
    pub before: VersionSummary,
    pub after: VersionSummary,
    pub changes: Vec<FieldDiff>,
}

/// Diff revision `v1` (before) against `v2` (after).
pub fn compare_versions(
    entity: EntityType,
    name: &str,
    history: &[VersionEntry],
    v1: &str,
    v2: &str,
) -> Result<VersionComparison, CoreError> {
    let not_found = |v: &str| CoreError::NotFound {
        entity: "version",
        id: format!("{name}@{v}"),
    };
    let before = find_version(history, v1).ok_or_else(|| not_found(v1))?;
    let after = find_version(history, v2).ok_or_else(|| not_found(v2))?;

    Ok(VersionComparison {
        entity,
        name: name.to_string(),
        before: before.summary(),
        after: after.summary(),
        changes: diff(entity.schema(), &before.record, &after.record),
    })
}

// ---------------------------------------------------------------------------
// Change comments
// ---------------------------------------------------------------------------

/// Build the structured comment stored with an update revision.
pub fn change_comment(fields: &[&str]) -> String {
    serde_json::json!([{ "changed": { "fields": fields } }]).to_string()
}

/// Comment for an update between two snapshots, or `None` when nothing in
/// `schema` changed.
pub fn change_comment_between(schema: &[FieldDef], before: &Record, after: &Record) -> Option<String> {
    let fields = crate::diff::changed_field_names(schema, before, after);
    if fields.is_empty() {
        None
    } else {
        Some(change_comment(&fields))
    }
}

/// Human-readable form of a stored revision comment.
///
/// Structured comments (`[{"added": {}}, {"changed": {"fields": [..]}},
/// {"deleted": {}}]`) are rendered as sentences; anything that is not such a
/// list is returned as-is.
pub fn render_change_comment(raw: &str) -> String {
    let Ok(Value::Array(messages)) = serde_json::from_str::<Value>(raw) else {
        return raw.trim().to_string();
    };

    let sentences: Vec<String> = messages.iter().filter_map(render_message).collect();
    if sentences.is_empty() {
        "No fields changed.".to_string()
    } else {
        sentences.join(" ")
    }
}

fn render_message(message: &Value) -> Option<String> {
    let obj = message.as_object()?;
    if obj.contains_key("added") {
        return Some("Added.".to_string());
    }
    if obj.contains_key("deleted") {
        return Some("Deleted.".to_string());
    }
    let changed = obj.get("changed")?;
    let fields: Vec<&str> = changed
        .get("fields")
        .and_then(Value::as_array)
        .map(|f| f.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if fields.is_empty() {
        return Some("No fields changed.".to_string());
    }
    Some(format!("Changed {}.", join_with_and(&fields)))
}

fn join_with_and(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

// ---------------------------------------------------------------------------
// Probe version references
// ---------------------------------------------------------------------------

/// A `probe (version)` reference as shown in metric lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeVersionRef {
    pub probe: String,
    pub version: String,
}

impl ProbeVersionRef {
    /// Parse `"<probe> (<version>)"`; `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let (probe, rest) = raw.trim().rsplit_once(" (")?;
        let version = rest.strip_suffix(')')?;
        if probe.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self {
            probe: probe.to_string(),
            version: version.to_string(),
        })
    }

    /// Console path of this probe version's history page.
    pub fn history_path(&self) -> String {
        format!("/ui/probes/{}/history/{}", self.probe, self.version)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
