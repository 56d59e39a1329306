//! Task aggregate root and the attribute set the importer resolves.

use super::{CompanyId, Deadline, ProjectId, StageId, TagId, TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mutable attributes of a task record.
///
/// The assignee and stage are always set; every other reference is
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    name: String,
    company: Option<CompanyId>,
    contact: Option<CompanyId>,
    assignee: UserId,
    deadline: Option<Deadline>,
    stage: StageId,
    macro_type_tags: BTreeSet<TagId>,
    activity_type_tags: BTreeSet<TagId>,
    project_code: Option<String>,
    project: Option<ProjectId>,
    description: Option<String>,
}

impl TaskDetails {
    /// Creates task details with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] if the trimmed name is
    /// empty.
    pub fn new(
        name: impl Into<String>,
        assignee: UserId,
        stage: StageId,
    ) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }

        Ok(Self {
            name: trimmed.to_owned(),
            company: None,
            contact: None,
            assignee,
            deadline: None,
            stage,
            macro_type_tags: BTreeSet::new(),
            activity_type_tags: BTreeSet::new(),
            project_code: None,
            project: None,
            description: None,
        })
    }

    /// Sets the customer company.
    #[must_use]
    pub const fn with_company(mut self, company: CompanyId) -> Self {
        self.company = Some(company);
        self
    }

    /// Sets the contact person.
    #[must_use]
    pub const fn with_contact(mut self, contact: CompanyId) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the macro type tags.
    #[must_use]
    pub fn with_macro_type_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.macro_type_tags = tags.into_iter().collect();
        self
    }

    /// Sets the activity type tags.
    #[must_use]
    pub fn with_activity_type_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.activity_type_tags = tags.into_iter().collect();
        self
    }

    /// Sets the commessa code exactly as written in the source row.
    ///
    /// The code is kept even when it is malformed or names no known project.
    #[must_use]
    pub fn with_project_code(mut self, code: impl Into<String>) -> Self {
        self.project_code = Some(code.into());
        self
    }

    /// Sets the resolved project.
    #[must_use]
    pub const fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the activity name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the customer company, if resolved.
    #[must_use]
    pub const fn company(&self) -> Option<CompanyId> {
        self.company
    }

    /// Returns the contact person, if resolved.
    #[must_use]
    pub const fn contact(&self) -> Option<CompanyId> {
        self.contact
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the deadline, if parsed.
    #[must_use]
    pub const fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    /// Returns the stage.
    #[must_use]
    pub const fn stage(&self) -> StageId {
        self.stage
    }

    /// Returns the macro type tags.
    #[must_use]
    pub const fn macro_type_tags(&self) -> &BTreeSet<TagId> {
        &self.macro_type_tags
    }

    /// Returns the activity type tags.
    #[must_use]
    pub const fn activity_type_tags(&self) -> &BTreeSet<TagId> {
        &self.activity_type_tags
    }

    /// Returns the raw commessa code, if any.
    #[must_use]
    pub fn project_code(&self) -> Option<&str> {
        self.project_code.as_deref()
    }

    /// Returns the resolved project, if any.
    #[must_use]
    pub const fn project(&self) -> Option<ProjectId> {
        self.project
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    details: TaskDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task attributes.
    pub details: TaskDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from resolved details.
    #[must_use]
    pub fn new(details: TaskDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            details,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            details: data.details,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task attributes.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces every attribute with a freshly reconciled set, keeping the
    /// identifier and creation timestamp.
    pub fn replace_details(&mut self, details: TaskDetails, clock: &impl Clock) {
        self.details = details;
        self.touch(clock);
    }

    /// Moves the task to another stage.
    ///
    /// Stages have no transition graph: any stage may follow any other.
    pub fn move_to_stage(&mut self, stage: StageId, clock: &impl Clock) {
        self.details.stage = stage;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
