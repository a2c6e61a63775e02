//! Collaborator seams between the console and its configuration backend.
//!
//! The API service depends only on these traits, so tests can swap the HTTP
//! client for an in-memory backend.

use async_trait::async_trait;
use monconsole_core::columns::ListOptions;
use monconsole_core::history::VersionEntry;
use monconsole_core::import::{ImportReport, ImportRequest};
use monconsole_core::permissions::AuthContext;
use monconsole_core::record::Record;
use monconsole_core::schema::EntityType;
use monconsole_core::tenants::Tenant;

use crate::api::ApiError;

/// Read access to entity records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Every record of `entity` visible to the caller, in backend order.
    async fn fetch_many(&self, entity: EntityType) -> Result<Vec<Record>, ApiError>;

    async fn fetch_one(&self, entity: EntityType, name: &str) -> Result<Record, ApiError>;

    /// Revisions of one record, newest first.
    async fn fetch_version_history(
        &self,
        entity: EntityType,
        name: &str,
    ) -> Result<Vec<VersionEntry>, ApiError>;

    /// Dropdown options for the list view of `entity`.
    async fn fetch_options(&self, entity: EntityType) -> Result<ListOptions, ApiError>;

    async fn fetch_public_tenants(&self) -> Result<Vec<Tenant>, ApiError>;
}

/// Target of bulk actions on a selection.
#[async_trait]
pub trait BulkActionSink: Send + Sync {
    async fn submit_selection(&self, request: &ImportRequest) -> Result<ImportReport, ApiError>;
}

/// Turns a bearer token into the session's authorization context.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<AuthContext, ApiError>;
}
