//! `PostgreSQL` repository implementation for imported tasks.

use super::{TaskPgPool, models::TaskRow, run_blocking, schema::tasks};
use crate::task::{
    domain::{
        CompanyId, Deadline, PersistedTaskData, ProjectId, StageId, TagId, Task, TaskDetails,
        TaskId, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);

        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_name_and_project(
        &self,
        name: &str,
        project: Option<ProjectId>,
    ) -> TaskRepositoryResult<Option<Task>> {
        let lookup_name = name.to_owned();
        run_blocking(&self.pool, move |connection| {
            let mut query = tasks::table
                .filter(tasks::name.eq(lookup_name))
                .select(TaskRow::as_select())
                .order(tasks::created_at.asc())
                .into_boxed();
            query = match project {
                Some(project_id) => query.filter(tasks::project_id.eq(project_id.into_inner())),
                None => query.filter(tasks::project_id.is_null()),
            };
            let row = query
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .select(TaskRow::as_select())
                .order(tasks::created_at.asc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRow {
    let details = task.details();
    TaskRow {
        id: task.id().into_inner(),
        name: details.name().to_owned(),
        company_id: details.company().map(CompanyId::into_inner),
        contact_id: details.contact().map(CompanyId::into_inner),
        user_id: details.assignee().into_inner(),
        date_deadline: details.deadline().map(Deadline::to_date_time),
        deadline_has_time: details.deadline().is_some_and(Deadline::has_time),
        stage_id: details.stage().into_inner(),
        macro_type_tag_ids: details
            .macro_type_tags()
            .iter()
            .map(|tag| tag.into_inner())
            .collect(),
        activity_type_tag_ids: details
            .activity_type_tags()
            .iter()
            .map(|tag| tag.into_inner())
            .collect(),
        project_code: details.project_code().map(str::to_owned),
        project_id: details.project().map(ProjectId::into_inner),
        description: details.description().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        name,
        company_id,
        contact_id,
        user_id,
        date_deadline,
        deadline_has_time,
        stage_id,
        macro_type_tag_ids,
        activity_type_tag_ids,
        project_code,
        project_id,
        description,
        created_at,
        updated_at,
    } = row;

    let mut details = TaskDetails::new(
        name,
        UserId::from_uuid(user_id),
        StageId::from_uuid(stage_id),
    )
    .map_err(TaskRepositoryError::persistence)?
    .with_macro_type_tags(macro_type_tag_ids.into_iter().map(TagId::from_uuid))
    .with_activity_type_tags(activity_type_tag_ids.into_iter().map(TagId::from_uuid));

    if let Some(company) = company_id {
        details = details.with_company(CompanyId::from_uuid(company));
    }
    if let Some(contact) = contact_id {
        details = details.with_contact(CompanyId::from_uuid(contact));
    }
    if let Some(deadline) = date_deadline {
        details = details.with_deadline(if deadline_has_time {
            Deadline::DateTime(deadline)
        } else {
            Deadline::Date(deadline.date())
        });
    }
    if let Some(code) = project_code {
        details = details.with_project_code(code);
    }
    if let Some(project) = project_id {
        details = details.with_project(ProjectId::from_uuid(project));
    }
    if let Some(text) = description {
        details = details.with_description(text);
    }

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        details,
        created_at,
        updated_at,
    }))
}
