//! Monitoring console core library.
//!
//! Pure, synchronous building blocks shared by the HTTP client and the API
//! service: the record model, per-entity field schemas, the field-set
//! differ, the filterable tabular list with its selection state, version
//! history helpers, key/value form arrays, the authorization context and the
//! tenant dashboard layout. Nothing in here performs I/O.

pub mod columns;
pub mod diff;
pub mod error;
pub mod history;
pub mod import;
pub mod kv_editor;
pub mod listing;
pub mod permissions;
pub mod record;
pub mod schema;
pub mod selection;
pub mod tenants;
pub mod types;
