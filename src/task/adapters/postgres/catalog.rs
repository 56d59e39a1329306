//! `PostgreSQL` tag and stage catalogs.
//!
//! Creation is an insert guarded by the unique indexes from the migration,
//! followed by a re-select. Concurrent importers racing on the same label
//! both read back the single surviving row.

use super::{
    TaskPgPool,
    models::{StageRow, TagRow},
    run_blocking,
    schema::{task_stages, task_tags},
};
use crate::task::{
    domain::{ProjectId, Stage, StageId, StageLabel, Tag, TagCategory, TagId, TagLabel},
    ports::{CatalogError, CatalogResult, StageCatalog, TagCatalog},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed tag catalog.
#[derive(Debug, Clone)]
pub struct PostgresTagCatalog {
    pool: TaskPgPool,
}

impl PostgresTagCatalog {
    /// Creates a catalog from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

fn select_tag(
    connection: &mut PgConnection,
    label: &str,
    category: TagCategory,
) -> CatalogResult<Option<TagRow>> {
    task_tags::table
        .filter(task_tags::label.eq(label))
        .filter(task_tags::category.eq(category.as_str()))
        .select(TagRow::as_select())
        .first::<TagRow>(connection)
        .optional()
        .map_err(CatalogError::persistence)
}

fn row_to_tag(row: TagRow) -> CatalogResult<Tag> {
    let label = TagLabel::new(row.label).map_err(CatalogError::persistence)?;
    let category =
        TagCategory::try_from(row.category.as_str()).map_err(CatalogError::persistence)?;
    Ok(Tag::from_persisted(TagId::from_uuid(row.id), label, category))
}

#[async_trait]
impl TagCatalog for PostgresTagCatalog {
    async fn get_or_create(&self, label: &TagLabel, category: TagCategory) -> CatalogResult<Tag> {
        let candidate = Tag::new(label.clone(), category);
        run_blocking(&self.pool, move |connection| {
            let new_row = TagRow {
                id: candidate.id().into_inner(),
                label: candidate.label().as_str().to_owned(),
                category: category.as_str().to_owned(),
            };
            let inserted = diesel::insert_into(task_tags::table)
                .values(&new_row)
                .on_conflict((task_tags::label, task_tags::category))
                .do_nothing()
                .execute(connection)
                .map_err(CatalogError::persistence)?;
            if inserted > 0 {
                tracing::info!(
                    label = candidate.label().as_str(),
                    category = category.as_str(),
                    "created tag"
                );
                return Ok(candidate);
            }

            let existing = select_tag(connection, candidate.label().as_str(), category)?
                .ok_or_else(|| {
                    CatalogError::persistence(std::io::Error::other(
                        "tag vanished after insert conflict",
                    ))
                })?;
            row_to_tag(existing)
        })
        .await
    }

    async fn find(&self, label: &TagLabel, category: TagCategory) -> CatalogResult<Option<Tag>> {
        let lookup = label.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            select_tag(connection, &lookup, category)?
                .map(row_to_tag)
                .transpose()
        })
        .await
    }

    async fn list(&self, category: TagCategory) -> CatalogResult<Vec<Tag>> {
        run_blocking(&self.pool, move |connection| {
            let rows = task_tags::table
                .filter(task_tags::category.eq(category.as_str()))
                .order(task_tags::label.asc())
                .select(TagRow::as_select())
                .load::<TagRow>(connection)
                .map_err(CatalogError::persistence)?;
            rows.into_iter().map(row_to_tag).collect()
        })
        .await
    }
}

/// `PostgreSQL`-backed stage catalog.
#[derive(Debug, Clone)]
pub struct PostgresStageCatalog {
    pool: TaskPgPool,
}

impl PostgresStageCatalog {
    /// Creates a catalog from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

fn row_to_stage(row: StageRow) -> CatalogResult<Stage> {
    let label = StageLabel::new(row.label).map_err(CatalogError::persistence)?;
    Ok(Stage::from_persisted(
        StageId::from_uuid(row.id),
        label,
        row.project_id.map(ProjectId::from_uuid),
        row.folded,
    ))
}

fn select_global_stage(
    connection: &mut PgConnection,
    label: &str,
) -> CatalogResult<Option<StageRow>> {
    diesel::sql_query(concat!(
        "SELECT id, label, project_id, folded FROM task_stages ",
        "WHERE project_id IS NULL AND lower(label) = lower($1) ",
        "ORDER BY created_at LIMIT 1",
    ))
    .bind::<diesel::sql_types::Text, _>(label)
    .get_result::<StageRow>(connection)
    .optional()
    .map_err(CatalogError::persistence)
}

#[async_trait]
impl StageCatalog for PostgresStageCatalog {
    async fn get_or_create(&self, label: &StageLabel) -> CatalogResult<Stage> {
        let candidate = Stage::new(label.clone());
        run_blocking(&self.pool, move |connection| {
            // The partial unique index on lower(label) for global stages makes
            // this a no-op when a concurrent import created the stage first.
            let inserted = diesel::sql_query(concat!(
                "INSERT INTO task_stages (id, label, project_id, folded) ",
                "VALUES ($1, $2, NULL, $3) ON CONFLICT DO NOTHING",
            ))
            .bind::<diesel::sql_types::Uuid, _>(candidate.id().into_inner())
            .bind::<diesel::sql_types::Text, _>(candidate.label().as_str())
            .bind::<diesel::sql_types::Bool, _>(candidate.is_folded())
            .execute(connection)
            .map_err(CatalogError::persistence)?;
            if inserted > 0 {
                tracing::info!(label = candidate.label().as_str(), "created stage");
                return Ok(candidate);
            }

            let existing = select_global_stage(connection, candidate.label().as_str())?
                .ok_or_else(|| {
                    CatalogError::persistence(std::io::Error::other(
                        "stage vanished after insert conflict",
                    ))
                })?;
            row_to_stage(existing)
        })
        .await
    }

    async fn find_by_id(&self, id: StageId) -> CatalogResult<Option<Stage>> {
        run_blocking(&self.pool, move |connection| {
            task_stages::table
                .filter(task_stages::id.eq(id.into_inner()))
                .select(StageRow::as_select())
                .first::<StageRow>(connection)
                .optional()
                .map_err(CatalogError::persistence)?
                .map(row_to_stage)
                .transpose()
        })
        .await
    }
}
