//! Entity catalogue: the managed entity types and their field schemas.
//!
//! Schemas are compile-time tables rather than something discovered from
//! the backend at runtime. Field order is the order compare views render in.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field schema
// ---------------------------------------------------------------------------

/// Shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar,
    List,
}

/// One field of an entity schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Key of the field in the record JSON.
    pub name: &'static str,
    /// Human-readable label for compare and detail views.
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn scalar(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn list(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::List,
        }
    }
}

/// Key/value list fields shared by metrics and metric templates.
pub const CONFIG_FIELD: &str = "config";
pub const FLAGS_FIELD: &str = "flags";

const METRIC_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("name", "name"),
    FieldDef::scalar("probeversion", "probe version"),
    FieldDef::scalar("mtype", "type"),
    FieldDef::scalar("group", "group"),
    FieldDef::scalar("probeexecutable", "probe executable"),
    FieldDef::scalar("parent", "parent"),
    FieldDef::list(CONFIG_FIELD, "config"),
    FieldDef::list("attribute", "attribute"),
    FieldDef::list("dependancy", "dependency"),
    FieldDef::list("parameter", "parameter"),
    FieldDef::list(FLAGS_FIELD, "flags"),
    FieldDef::list("files", "file attributes"),
    FieldDef::list("fileparameter", "file parameters"),
];

const METRIC_TEMPLATE_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("name", "name"),
    FieldDef::scalar("probeversion", "probe version"),
    FieldDef::scalar("mtype", "type"),
    FieldDef::scalar("probeexecutable", "probe executable"),
    FieldDef::scalar("parent", "parent"),
    FieldDef::list(CONFIG_FIELD, "config"),
    FieldDef::list("attribute", "attribute"),
    FieldDef::list("dependancy", "dependency"),
    FieldDef::list("parameter", "parameter"),
    FieldDef::list(FLAGS_FIELD, "flags"),
    FieldDef::list("files", "file attributes"),
    FieldDef::list("fileparameter", "file parameters"),
];

const PROBE_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("name", "name"),
    FieldDef::scalar("version", "version"),
    FieldDef::scalar("repository", "repository"),
    FieldDef::scalar("docurl", "documentation"),
    FieldDef::scalar("description", "description"),
    FieldDef::scalar("comment", "comment"),
];

const AGGREGATION_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("name", "name"),
    FieldDef::scalar("groupname", "group"),
    FieldDef::scalar("endpoint_group", "endpoint group"),
    FieldDef::scalar("metric_operation", "metric operation"),
    FieldDef::scalar("profile_operation", "aggregation operation"),
    FieldDef::scalar("metric_profile", "metric profile"),
];

// ---------------------------------------------------------------------------
// Entity types
// ---------------------------------------------------------------------------

/// The configuration entities the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Metric,
    MetricTemplate,
    Probe,
    AggregationProfile,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        Self::Metric,
        Self::MetricTemplate,
        Self::Probe,
        Self::AggregationProfile,
    ];

    /// String representation for display and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::MetricTemplate => "metric_template",
            Self::Probe => "probe",
            Self::AggregationProfile => "aggregation_profile",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Metric => "Metric",
            Self::MetricTemplate => "Metric template",
            Self::Probe => "Probe",
            Self::AggregationProfile => "Aggregation profile",
        }
    }

    /// Path segment used by both the console routes and the backend's
    /// internal API.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::MetricTemplate => "metrictemplates",
            Self::Probe => "probes",
            Self::AggregationProfile => "aggregations",
        }
    }

    /// Segment used by the backend's version history endpoints.
    pub fn history_segment(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::MetricTemplate => "metrictemplate",
            Self::Probe => "probe",
            Self::AggregationProfile => "aggregation",
        }
    }

    /// Whether history lives in the tenant schema (`tenantversion`) rather
    /// than the shared schema (`version`).
    pub fn is_tenant_scoped(&self) -> bool {
        matches!(self, Self::Metric | Self::AggregationProfile)
    }

    /// Field holding the stable record identifier.
    pub fn id_field(&self) -> &'static str {
        "name"
    }

    /// Field holding the owning group, for entities that have one.
    pub fn group_field(&self) -> Option<&'static str> {
        match self {
            Self::Metric => Some("group"),
            Self::AggregationProfile => Some("groupname"),
            Self::MetricTemplate | Self::Probe => None,
        }
    }

    /// Key under which the backend's session groups list this entity.
    pub fn permission_key(&self) -> &'static str {
        match self {
            Self::Metric => "metrics",
            Self::MetricTemplate => "metrictemplates",
            Self::Probe => "probes",
            Self::AggregationProfile => "aggregations",
        }
    }

    /// The compile-time field schema.
    pub fn schema(&self) -> &'static [FieldDef] {
        match self {
            Self::Metric => METRIC_FIELDS,
            Self::MetricTemplate => METRIC_TEMPLATE_FIELDS,
            Self::Probe => PROBE_FIELDS,
            Self::AggregationProfile => AGGREGATION_FIELDS,
        }
    }

    /// Parse a route path segment (`metric`, `metrictemplates`, ...).
    pub fn from_path_segment(segment: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|e| e.path_segment() == segment)
            .ok_or_else(|| CoreError::Validation(format!("Unknown entity type '{segment}'")))
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
