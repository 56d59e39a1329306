//! Row reconciliation: one spreadsheet line to one set of task attributes.
//!
//! Every column resolves independently. Only a missing activity name stops
//! the row; unresolved references fall back to documented defaults and are
//! reported as [`ImportIssue`]s.

use crate::task::{
    domain::{
        CompanyRef, Deadline, ImportColumn, ImportRow, ProjectCode, ProjectRef, StageId, StageLabel,
        StandardStage, TagCategory, TagId, TagLabel, TaskDetails, UserId,
    },
    ports::{CatalogError, ReferenceDirectory, StageCatalog, TagCatalog},
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Fallback values applied when a row leaves a required reference open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileContext {
    /// User running the import; assignee when the row names nobody known.
    pub current_user: UserId,
    /// Stage used when neither the status nor the project yields one.
    pub default_stage: StageId,
}

impl ReconcileContext {
    /// Creates a context from the operator and the global default stage.
    #[must_use]
    pub const fn new(current_user: UserId, default_stage: StageId) -> Self {
        Self {
            current_user,
            default_stage,
        }
    }
}

/// Kind of non-fatal problem met while resolving a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportIssueKind {
    /// A name or label matched no known record; a fallback was applied.
    UnresolvedReference,
    /// The date matched no supported layout; the deadline stays unset.
    UnparsableDate,
    /// The commessa is not `XXXXX-YY`; the project stays unresolved.
    InvalidProjectCodeFormat,
}

impl ImportIssueKind {
    /// Returns a short description of the issue kind.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnresolvedReference => "unresolved reference",
            Self::UnparsableDate => "unparsable date",
            Self::InvalidProjectCodeFormat => "invalid commessa format",
        }
    }
}

/// Non-fatal problem recorded for audit after the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    /// Source line of the row.
    pub line: usize,
    /// Column holding the offending value.
    pub column: ImportColumn,
    /// Raw cell value, trimmed.
    pub value: String,
    /// What went wrong.
    pub kind: ImportIssueKind,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column '{}': {} '{}'",
            self.line,
            self.column,
            self.kind.description(),
            self.value
        )
    }
}

/// Errors that stop a single row.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// The activity name is missing or blank.
    #[error("line {line}: required column '{column}' is empty")]
    MissingRequiredField {
        /// Source line of the row.
        line: usize,
        /// The empty column.
        column: ImportColumn,
    },
    /// A lookup or get-or-create call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Resolved attributes for one row, plus every fallback that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledTask {
    /// Attributes ready to create or update a task with.
    pub details: TaskDetails,
    /// The project the commessa resolved to, if any.
    pub project: Option<ProjectRef>,
    /// Non-fatal issues, in the order they were met.
    pub issues: Vec<ImportIssue>,
}

/// Maps spreadsheet rows onto task attributes.
#[derive(Clone)]
pub struct TaskImportReconciler<D, T, S>
where
    D: ReferenceDirectory,
    T: TagCatalog,
    S: StageCatalog,
{
    directory: Arc<D>,
    tags: Arc<T>,
    stages: Arc<S>,
}

struct IssueLog {
    line: usize,
    issues: Vec<ImportIssue>,
}

impl IssueLog {
    const fn new(line: usize) -> Self {
        Self {
            line,
            issues: Vec::new(),
        }
    }

    fn record(&mut self, column: ImportColumn, value: &str, kind: ImportIssueKind) {
        tracing::info!(
            line = self.line,
            column = column.label(),
            value,
            issue = kind.description(),
            "fallback applied while importing activity"
        );
        self.issues.push(ImportIssue {
            line: self.line,
            column,
            value: value.to_owned(),
            kind,
        });
    }
}

impl<D, T, S> TaskImportReconciler<D, T, S>
where
    D: ReferenceDirectory,
    T: TagCatalog,
    S: StageCatalog,
{
    /// Creates a reconciler over the given lookups.
    #[must_use]
    pub const fn new(directory: Arc<D>, tags: Arc<T>, stages: Arc<S>) -> Self {
        Self {
            directory,
            tags,
            stages,
        }
    }

    /// Resolves one row into task attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::MissingRequiredField`] when the activity
    /// name is blank, or [`ReconcileError::Catalog`] when a lookup fails.
    pub async fn reconcile(
        &self,
        row: &ImportRow,
        context: &ReconcileContext,
    ) -> Result<ReconciledTask, ReconcileError> {
        let name = row
            .value(ImportColumn::Name)
            .ok_or(ReconcileError::MissingRequiredField {
                line: row.line(),
                column: ImportColumn::Name,
            })?;
        let mut log = IssueLog::new(row.line());

        let project = self.resolve_project(row, &mut log).await?;
        let assignee = self.resolve_assignee(row, context, &mut log).await?;
        let stage = self
            .resolve_stage(row, project.as_ref(), context, &mut log)
            .await?;

        let mut details = TaskDetails::new(name, assignee, stage).map_err(|_| {
            ReconcileError::MissingRequiredField {
                line: row.line(),
                column: ImportColumn::Name,
            }
        })?;

        if let Some(company) = self
            .resolve_partner(row, ImportColumn::Company, &mut log)
            .await?
        {
            details = details.with_company(company.id);
        }
        if let Some(contact) = self
            .resolve_partner(row, ImportColumn::Contact, &mut log)
            .await?
        {
            details = details.with_contact(contact.id);
        }
        if let Some(deadline) = resolve_deadline(row, &mut log) {
            details = details.with_deadline(deadline);
        }
        if let Some(planned) = row.value(ImportColumn::Duration) {
            tracing::debug!(line = row.line(), value = planned, "planned time is not imported");
        }

        let macro_types = self
            .resolve_tags(row, ImportColumn::MacroType, TagCategory::MacroType)
            .await?;
        let activity_types = self
            .resolve_tags(row, ImportColumn::ActivityType, TagCategory::ActivityType)
            .await?;
        details = details
            .with_macro_type_tags(macro_types)
            .with_activity_type_tags(activity_types);

        if let Some(code) = row.value(ImportColumn::ProjectCode) {
            details = details.with_project_code(code);
        }
        if let Some(project_ref) = &project {
            details = details.with_project(project_ref.id);
        }
        if let Some(description) = row.value(ImportColumn::Description) {
            details = details.with_description(description);
        }

        Ok(ReconciledTask {
            details,
            project,
            issues: log.issues,
        })
    }

    async fn resolve_project(
        &self,
        row: &ImportRow,
        log: &mut IssueLog,
    ) -> Result<Option<ProjectRef>, ReconcileError> {
        let Some(raw) = row.value(ImportColumn::ProjectCode) else {
            return Ok(None);
        };
        let Ok(code) = ProjectCode::new(raw) else {
            log.record(
                ImportColumn::ProjectCode,
                raw,
                ImportIssueKind::InvalidProjectCodeFormat,
            );
            return Ok(None);
        };

        let project = self.directory.find_project_by_code(&code).await?;
        if project.is_none() {
            log.record(
                ImportColumn::ProjectCode,
                raw,
                ImportIssueKind::UnresolvedReference,
            );
        }
        Ok(project)
    }

    async fn resolve_assignee(
        &self,
        row: &ImportRow,
        context: &ReconcileContext,
        log: &mut IssueLog,
    ) -> Result<UserId, ReconcileError> {
        let Some(name) = row.value(ImportColumn::Assignee) else {
            return Ok(context.current_user);
        };
        match self.directory.find_user_by_name(name).await? {
            Some(user) => Ok(user.id),
            None => {
                log.record(
                    ImportColumn::Assignee,
                    name,
                    ImportIssueKind::UnresolvedReference,
                );
                Ok(context.current_user)
            }
        }
    }

    async fn resolve_stage(
        &self,
        row: &ImportRow,
        project: Option<&ProjectRef>,
        context: &ReconcileContext,
        log: &mut IssueLog,
    ) -> Result<StageId, ReconcileError> {
        let status = row.value(ImportColumn::Status);
        if let Some(standard) = status.and_then(StandardStage::from_status) {
            let stage = self
                .stages
                .get_or_create(&StageLabel::from(standard))
                .await?;
            return Ok(stage.id());
        }

        if let Some(unknown) = status {
            log.record(
                ImportColumn::Status,
                unknown,
                ImportIssueKind::UnresolvedReference,
            );
        }
        Ok(project
            .and_then(|project_ref| project_ref.default_stage)
            .unwrap_or(context.default_stage))
    }

    async fn resolve_partner(
        &self,
        row: &ImportRow,
        column: ImportColumn,
        log: &mut IssueLog,
    ) -> Result<Option<CompanyRef>, ReconcileError> {
        let Some(name) = row.value(column) else {
            return Ok(None);
        };
        let partner = self.directory.find_company_by_name(name).await?;
        if partner.is_none() {
            log.record(column, name, ImportIssueKind::UnresolvedReference);
        }
        Ok(partner)
    }

    async fn resolve_tags(
        &self,
        row: &ImportRow,
        column: ImportColumn,
        category: TagCategory,
    ) -> Result<Vec<TagId>, ReconcileError> {
        let Some(cell) = row.value(column) else {
            return Ok(Vec::new());
        };
        let mut ids = Vec::new();
        for label in TagLabel::split_list(cell) {
            let tag = self.tags.get_or_create(&label, category).await?;
            ids.push(tag.id());
        }
        Ok(ids)
    }
}

fn resolve_deadline(row: &ImportRow, log: &mut IssueLog) -> Option<Deadline> {
    let raw = row.value(ImportColumn::Date)?;
    let parsed = Deadline::parse(raw);
    if parsed.is_none() {
        log.record(ImportColumn::Date, raw, ImportIssueKind::UnparsableDate);
    }
    parsed
}
