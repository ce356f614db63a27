pub mod admin;
pub mod clients;
pub mod cve_links;
pub mod dashboard;
pub mod findings;
pub mod settings;
pub mod surveys;
