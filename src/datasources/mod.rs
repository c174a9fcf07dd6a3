//! # Data Sources
//!
//! Read-only `clerk_application` and `clerk_organization` lookups.

pub mod application;
pub mod organization;

pub use application::ApplicationDataSource;
pub use organization::OrganizationDataSource;
