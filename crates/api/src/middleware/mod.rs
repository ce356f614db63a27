//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Verifies the Bearer token and loads the caller's profile.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireManager`] -- Requires `manager` or `admin`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
