//! Survey lifecycle and metrics library.
//!
//! Everything in this crate is storage-agnostic: callers fetch survey
//! records (already scoped to the requesting user) and pass them in. The
//! only I/O-facing piece is the [`store::SurveyStore`] contract, which the
//! persistence layer implements.

pub mod aggregate;
pub mod audit;
pub mod cve;
pub mod error;
pub mod filter;
pub mod findings;
pub mod history;
pub mod ordering;
pub mod roles;
pub mod settings;
pub mod staleness;
pub mod status;
pub mod store;
pub mod survey;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;
