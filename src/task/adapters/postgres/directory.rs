//! `PostgreSQL` reference directory over projects, users and partners.

use super::{
    TaskPgPool, escape_like,
    models::{CompanyRow, ProjectRow, UserRow},
    run_blocking,
    schema::{companies, projects, users},
};
use crate::task::{
    domain::{CompanyId, CompanyRef, ProjectCode, ProjectId, ProjectRef, StageId, UserId, UserRef},
    ports::{CatalogError, CatalogResult, ReferenceDirectory},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// Read-only `PostgreSQL` directory.
#[derive(Debug, Clone)]
pub struct PostgresReferenceDirectory {
    pool: TaskPgPool,
}

impl PostgresReferenceDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

fn first_company_like(
    connection: &mut PgConnection,
    pattern: String,
) -> CatalogResult<Option<CompanyRow>> {
    companies::table
        .filter(companies::name.ilike(pattern))
        .order(companies::name.asc())
        .select(CompanyRow::as_select())
        .first::<CompanyRow>(connection)
        .optional()
        .map_err(CatalogError::persistence)
}

#[async_trait]
impl ReferenceDirectory for PostgresReferenceDirectory {
    async fn find_project_by_code(&self, code: &ProjectCode) -> CatalogResult<Option<ProjectRef>> {
        let lookup = code.clone();
        run_blocking(&self.pool, move |connection| {
            let row = projects::table
                .filter(projects::code.eq(lookup.as_str()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(CatalogError::persistence)?;
            Ok(row.map(|project| ProjectRef {
                id: ProjectId::from_uuid(project.id),
                code: lookup,
                name: project.name,
                default_stage: project.default_stage_id.map(StageId::from_uuid),
            }))
        })
        .await
    }

    async fn find_user_by_name(&self, name: &str) -> CatalogResult<Option<UserRef>> {
        let lookup = name.to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::name.eq(lookup))
                .order(users::name.asc())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(CatalogError::persistence)?;
            Ok(row.map(|user| UserRef {
                id: UserId::from_uuid(user.id),
                name: user.name,
            }))
        })
        .await
    }

    async fn find_company_by_name(&self, name: &str) -> CatalogResult<Option<CompanyRef>> {
        let escaped = escape_like(name);
        run_blocking(&self.pool, move |connection| {
            let exact = first_company_like(connection, escaped.clone())?;
            let row = match exact {
                Some(found) => Some(found),
                None => first_company_like(connection, format!("%{escaped}%"))?,
            };
            Ok(row.map(|company| CompanyRef {
                id: CompanyId::from_uuid(company.id),
                name: company.name,
            }))
        })
        .await
    }
}
