//! Read-only lookups for the projects, users and partners a row names.
//!
//! The importer never creates or changes these records.

use crate::task::{
    domain::{CompanyRef, ProjectCode, ProjectRef, UserRef},
    ports::CatalogResult,
};
use async_trait::async_trait;

/// Lookup contract for records owned outside the importer.
#[async_trait]
pub trait ReferenceDirectory: Send + Sync {
    /// Finds the project carrying the given commessa code.
    async fn find_project_by_code(&self, code: &ProjectCode) -> CatalogResult<Option<ProjectRef>>;

    /// Finds a user whose display name equals `name` exactly.
    async fn find_user_by_name(&self, name: &str) -> CatalogResult<Option<UserRef>>;

    /// Finds a partner by name.
    ///
    /// A case-insensitive exact match wins; otherwise the first partner
    /// whose name contains `name`, ignoring case, is returned.
    async fn find_company_by_name(&self, name: &str) -> CatalogResult<Option<CompanyRef>>;
}
