//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the session behind a Bearer token.
//! - [`rbac::RequireSuperuser`] -- Requires a superuser session.

pub mod auth;
pub mod rbac;
