//! Backend access for the monitoring console.
//!
//! [`api::ConsoleApi`] talks to the configuration backend over HTTP and
//! implements the collaborator traits in [`source`]; [`orchestrate`] combines
//! them into the multi-request flows the list and compare views need.

pub mod api;
pub mod config;
pub mod orchestrate;
pub mod source;

pub use api::{ApiError, ConsoleApi};
pub use config::ClientConfig;
pub use source::{BulkActionSink, IdentityProvider, RecordSource};
