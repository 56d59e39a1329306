//! In-memory reference directory seeded by the caller.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{CompanyRef, ProjectCode, ProjectRef, UserRef},
    ports::{CatalogError, CatalogResult, ReferenceDirectory},
};

/// Thread-safe in-memory directory of projects, users and partners.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    projects: Vec<ProjectRef>,
    users: Vec<UserRef>,
    companies: Vec<CompanyRef>,
}

fn poisoned(err: impl ToString) -> CatalogError {
    CatalogError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryReferenceDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the lock is poisoned.
    pub fn add_project(&self, project: ProjectRef) -> CatalogResult<()> {
        self.state.write().map_err(poisoned)?.projects.push(project);
        Ok(())
    }

    /// Adds a user.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the lock is poisoned.
    pub fn add_user(&self, user: UserRef) -> CatalogResult<()> {
        self.state.write().map_err(poisoned)?.users.push(user);
        Ok(())
    }

    /// Adds a company or contact partner.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the lock is poisoned.
    pub fn add_company(&self, company: CompanyRef) -> CatalogResult<()> {
        self.state.write().map_err(poisoned)?.companies.push(company);
        Ok(())
    }
}

#[async_trait]
impl ReferenceDirectory for InMemoryReferenceDirectory {
    async fn find_project_by_code(&self, code: &ProjectCode) -> CatalogResult<Option<ProjectRef>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .projects
            .iter()
            .find(|project| project.code == *code)
            .cloned())
    }

    async fn find_user_by_name(&self, name: &str) -> CatalogResult<Option<UserRef>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.iter().find(|user| user.name == name).cloned())
    }

    async fn find_company_by_name(&self, name: &str) -> CatalogResult<Option<CompanyRef>> {
        let state = self.state.read().map_err(poisoned)?;
        let needle = name.to_lowercase();
        let mut candidates: Vec<&CompanyRef> = state.companies.iter().collect();
        candidates.sort_by(|left, right| left.name.cmp(&right.name));

        let exact = candidates
            .iter()
            .find(|company| company.name.to_lowercase() == needle);
        let found = exact.or_else(|| {
            candidates
                .iter()
                .find(|company| company.name.to_lowercase().contains(&needle))
        });
        Ok(found.map(|company| (*company).clone()))
    }
}
