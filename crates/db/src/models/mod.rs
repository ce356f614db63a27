//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where the API writes the table directly, its input DTOs. Rows
//! that back the core store contract convert into the core types.

pub mod audit;
pub mod client;
pub mod contact;
pub mod cve_link;
pub mod finding;
pub mod history;
pub mod profile;
pub mod settings;
pub mod survey;
