//! Authorization context consulted by list and detail views.
//!
//! The backend owns every authorization rule; this is the read-only view of
//! the current session it hands out, passed explicitly into each request.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::schema::EntityType;

/// Immutable per-request authorization context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub username: String,
    pub is_superuser: bool,
    /// Groups in which the user may write, per entity type.
    #[serde(default)]
    pub write_groups: BTreeMap<EntityType, BTreeSet<String>>,
}

impl AuthContext {
    /// Build the context from a backend session payload:
    /// `{"active": true, "userdetails": {"username", "is_superuser",
    /// "groups": {"metrics": [..], "aggregations": [..]}}}`.
    ///
    /// Group keys that name no known entity are ignored.
    pub fn from_session_json(value: &Value) -> Result<Self, CoreError> {
        if !value.get("active").and_then(Value::as_bool).unwrap_or(false) {
            return Err(CoreError::Unauthorized("Session is not active".into()));
        }
        let details = value
            .get("userdetails")
            .ok_or_else(|| CoreError::MalformedRecord("session without 'userdetails'".into()))?;

        let mut write_groups = BTreeMap::new();
        if let Some(groups) = details.get("groups").and_then(Value::as_object) {
            for entity in EntityType::ALL {
                let Some(names) = groups.get(entity.permission_key()).and_then(Value::as_array)
                else {
                    continue;
                };
                let names: BTreeSet<String> = names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                write_groups.insert(entity, names);
            }
        }

        Ok(Self {
            username: details
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            is_superuser: details
                .get("is_superuser")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            write_groups,
        })
    }

    /// Groups with write permission for `entity`.
    pub fn groups_with_write_permission(&self, entity: EntityType) -> BTreeSet<String> {
        self.write_groups.get(&entity).cloned().unwrap_or_default()
    }

    /// Whether a record owned by `group` may be changed or deleted.
    ///
    /// Superusers may write everything. Entities without an owning group
    /// are writable by superusers only.
    pub fn can_write(&self, entity: EntityType, group: Option<&str>) -> bool {
        if self.is_superuser {
            return true;
        }
        match group {
            Some(g) => self
                .write_groups
                .get(&entity)
                .is_some_and(|groups| groups.contains(g)),
            None => false,
        }
    }

    /// Whether the user may add new records of `entity` at all.
    pub fn can_add(&self, entity: EntityType) -> bool {
        self.is_superuser
            || (entity.group_field().is_some()
                && self.write_groups.get(&entity).is_some_and(|g| !g.is_empty()))
    }

    /// Bulk import of metric templates is reserved for superusers.
    pub fn can_import(&self) -> bool {
        self.is_superuser
    }

    pub fn require_superuser(&self) -> Result<(), CoreError> {
        if self.is_superuser {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Superuser permission required".into()))
        }
    }
}
