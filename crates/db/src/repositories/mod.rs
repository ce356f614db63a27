//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod audit_repo;
pub mod client_repo;
pub mod contact_repo;
pub mod cve_link_repo;
pub mod finding_repo;
pub mod history_repo;
pub mod profile_repo;
pub mod settings_repo;
pub mod survey_repo;

pub use audit_repo::AuditLogRepo;
pub use client_repo::ClientRepo;
pub use contact_repo::ContactRepo;
pub use cve_link_repo::CveLinkRepo;
pub use finding_repo::{FindingCategoryRepo, FindingTemplateRepo};
pub use history_repo::HistoryRepo;
pub use profile_repo::ProfileRepo;
pub use settings_repo::SettingsRepo;
pub use survey_repo::SurveyRepo;
