use std::sync::Arc;

use monconsole_client::{BulkActionSink, IdentityProvider, RecordSource};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Read access to backend records.
    pub records: Arc<dyn RecordSource>,
    /// Target of metric template imports.
    pub bulk: Arc<dyn BulkActionSink>,
    /// Resolves bearer tokens into authorization contexts.
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Arc<ServerConfig>,
}
