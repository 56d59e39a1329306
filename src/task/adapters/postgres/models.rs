//! Diesel row models for activity import persistence.

use super::schema::{companies, projects, task_stages, task_tags, tasks, users};
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

/// Row shape for task records, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Activity name.
    pub name: String,
    /// Customer company.
    pub company_id: Option<uuid::Uuid>,
    /// Contact person.
    pub contact_id: Option<uuid::Uuid>,
    /// Assigned user.
    pub user_id: uuid::Uuid,
    /// Deadline, midnight for date-only values.
    pub date_deadline: Option<NaiveDateTime>,
    /// Whether `date_deadline` carries a time of day.
    pub deadline_has_time: bool,
    /// Workflow stage.
    pub stage_id: uuid::Uuid,
    /// Macro type tags.
    pub macro_type_tag_ids: Vec<uuid::Uuid>,
    /// Activity type tags.
    pub activity_type_tag_ids: Vec<uuid::Uuid>,
    /// Commessa code as imported.
    pub project_code: Option<String>,
    /// Resolved project.
    pub project_id: Option<uuid::Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row shape for task tags.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TagRow {
    /// Tag identifier.
    pub id: uuid::Uuid,
    /// Tag label.
    pub label: String,
    /// Tag category.
    pub category: String,
}

/// Row shape for task stages.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = task_stages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StageRow {
    /// Stage identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Stage label.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub label: String,
    /// Owning project.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Uuid>)]
    pub project_id: Option<uuid::Uuid>,
    /// Whether the stage is folded on boards.
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub folded: bool,
}

/// Project lookup row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Commessa code.
    pub code: Option<String>,
    /// Project name.
    pub name: String,
    /// Stage new tasks start in.
    pub default_stage_id: Option<uuid::Uuid>,
}

/// User lookup row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
}

/// Company lookup row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompanyRow {
    /// Partner identifier.
    pub id: uuid::Uuid,
    /// Partner name.
    pub name: String,
}
