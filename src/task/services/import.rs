//! Batch import of spreadsheet rows into task records.

use crate::task::{
    adapters::csv::{self as csv_adapter, CsvImportOptions, CsvReadError, CsvRowError},
    domain::{ImportColumn, ImportRow, Task, TaskId},
    ports::{ReferenceDirectory, StageCatalog, TagCatalog, TaskRepository, TaskRepositoryError},
    services::reconcile::{
        ImportIssue, ReconcileContext, ReconcileError, ReconciledTask, TaskImportReconciler,
    },
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Number of entries listed per section in [`ImportReport::summary`].
const SUMMARY_LIST_LIMIT: usize = 10;

/// What to do when a row names an activity that already exists.
///
/// Rows carry no natural key, so "already exists" means same name and same
/// resolved project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Always create a new task.
    #[default]
    AlwaysInsert,
    /// Overwrite the oldest matching task in place.
    UpdateExisting,
}

/// Errors raised by the import service.
#[derive(Debug, Error)]
pub enum TaskImportError {
    /// The row could not be reconciled.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    /// The task could not be stored.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The file could not be read.
    #[error(transparent)]
    Csv(#[from] CsvReadError),
}

/// Whether a row produced a new task or changed an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A new task was stored.
    Created(Task),
    /// An existing task was overwritten.
    Updated(Task),
}

impl ImportOutcome {
    /// Returns the affected task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::Created(task) | Self::Updated(task) => task,
        }
    }
}

/// Result of importing one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowImport {
    /// The stored task.
    pub outcome: ImportOutcome,
    /// Non-fatal issues met while resolving the row.
    pub issues: Vec<ImportIssue>,
}

/// A successfully imported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Source line.
    pub line: usize,
    /// Stored task.
    pub task_id: TaskId,
    /// Activity name.
    pub name: String,
    /// Commessa as written, if any.
    pub project_code: Option<String>,
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    /// Source line.
    pub line: usize,
    /// Activity name as written, if any.
    pub name: Option<String>,
    /// Commessa as written, if any.
    pub project_code: Option<String>,
    /// Why the row was skipped.
    pub message: String,
}

/// Outcome of a whole import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows that created a task.
    pub created: Vec<ImportEntry>,
    /// Rows that updated a task.
    pub updated: Vec<ImportEntry>,
    /// Rows that were skipped.
    pub failed: Vec<ImportFailure>,
    /// Non-fatal issues across all rows.
    pub issues: Vec<ImportIssue>,
}

const fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(text) => text,
        None => "N/A",
    }
}

fn push_section<T>(
    lines: &mut Vec<String>,
    title: &str,
    items: &[T],
    remainder: fn(usize) -> String,
    render: impl Fn(&T) -> String,
) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("{title}:"));
    lines.extend(
        items
            .iter()
            .take(SUMMARY_LIST_LIMIT)
            .map(|item| format!("- {}", render(item))),
    );
    let hidden = items.len().saturating_sub(SUMMARY_LIST_LIMIT);
    if hidden > 0 {
        lines.push(format!("... {}", remainder(hidden)));
    }
}

impl ImportReport {
    /// Returns `true` when no row failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Renders the human-readable summary shown after an import.
    ///
    /// Each list shows at most ten entries.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Import attività completato:".to_owned(),
            format!("- Attività create: {}", self.created.len()),
            format!("- Attività aggiornate: {}", self.updated.len()),
            format!("- Errori: {}", self.failed.len()),
        ];

        let render_entry = |entry: &ImportEntry| {
            format!(
                "{} (Commessa: {})",
                entry.name,
                or_na(entry.project_code.as_deref())
            )
        };
        push_section(
            &mut lines,
            "Attività create",
            &self.created,
            |hidden| format!("e altre {hidden} attività create"),
            render_entry,
        );
        push_section(
            &mut lines,
            "Attività aggiornate",
            &self.updated,
            |hidden| format!("e altre {hidden} attività aggiornate"),
            render_entry,
        );
        push_section(
            &mut lines,
            "Errori riscontrati",
            &self.failed,
            |hidden| format!("e altri {hidden} errori"),
            |failure| {
                format!(
                    "Riga {} - {} (Commessa: {}): {}",
                    failure.line,
                    or_na(failure.name.as_deref()),
                    or_na(failure.project_code.as_deref()),
                    failure.message
                )
            },
        );

        let mut summary = lines.join("\n");
        summary.push('\n');
        summary
    }
}

/// Imports rows into tasks, one at a time.
#[derive(Clone)]
pub struct TaskImportService<R, D, T, S, C>
where
    R: TaskRepository,
    D: ReferenceDirectory,
    T: TagCatalog,
    S: StageCatalog,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    reconciler: TaskImportReconciler<D, T, S>,
    clock: Arc<C>,
    policy: DuplicatePolicy,
}

impl<R, D, T, S, C> TaskImportService<R, D, T, S, C>
where
    R: TaskRepository,
    D: ReferenceDirectory,
    T: TagCatalog,
    S: StageCatalog,
    C: Clock + Send + Sync,
{
    /// Creates an import service with the default duplicate policy.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        reconciler: TaskImportReconciler<D, T, S>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            reconciler,
            clock,
            policy: DuplicatePolicy::default(),
        }
    }

    /// Sets the duplicate policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the active duplicate policy.
    #[must_use]
    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Reconciles and stores a single row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskImportError::Reconcile`] when the row has no activity
    /// name or a lookup fails, and [`TaskImportError::Repository`] when the
    /// task cannot be stored.
    pub async fn import_row(
        &self,
        row: &ImportRow,
        context: &ReconcileContext,
    ) -> Result<RowImport, TaskImportError> {
        let ReconciledTask {
            details, issues, ..
        } = self.reconciler.reconcile(row, context).await?;

        let existing = match self.policy {
            DuplicatePolicy::AlwaysInsert => None,
            DuplicatePolicy::UpdateExisting => {
                self.repository
                    .find_by_name_and_project(details.name(), details.project())
                    .await?
            }
        };

        let outcome = if let Some(mut task) = existing {
            task.replace_details(details, &*self.clock);
            self.repository.update(&task).await?;
            tracing::info!(line = row.line(), task_id = %task.id(), "updated activity");
            ImportOutcome::Updated(task)
        } else {
            let task = Task::new(details, &*self.clock);
            self.repository.store(&task).await?;
            tracing::info!(line = row.line(), task_id = %task.id(), "created activity");
            ImportOutcome::Created(task)
        };

        Ok(RowImport { outcome, issues })
    }

    /// Imports rows in order. A failing row is recorded in the report and
    /// does not stop the rows after it.
    pub async fn import_rows<I>(&self, rows: I, context: &ReconcileContext) -> ImportReport
    where
        I: IntoIterator<Item = Result<ImportRow, CsvRowError>>,
    {
        let mut report = ImportReport::default();
        for parsed in rows {
            let row = match parsed {
                Ok(row) => row,
                Err(err) => {
                    tracing::warn!(line = err.line, error = %err.message, "skipping unreadable CSV record");
                    report.failed.push(ImportFailure {
                        line: err.line,
                        name: None,
                        project_code: None,
                        message: err.message,
                    });
                    continue;
                }
            };

            match self.import_row(&row, context).await {
                Ok(RowImport { outcome, issues }) => {
                    report.issues.extend(issues);
                    let entry = ImportEntry {
                        line: row.line(),
                        task_id: outcome.task().id(),
                        name: outcome.task().details().name().to_owned(),
                        project_code: outcome
                            .task()
                            .details()
                            .project_code()
                            .map(str::to_owned),
                    };
                    match outcome {
                        ImportOutcome::Created(_) => report.created.push(entry),
                        ImportOutcome::Updated(_) => report.updated.push(entry),
                    }
                }
                Err(err) => {
                    tracing::warn!(line = row.line(), error = %err, "skipping activity row");
                    report.failed.push(ImportFailure {
                        line: row.line(),
                        name: row.value(ImportColumn::Name).map(str::to_owned),
                        project_code: row.value(ImportColumn::ProjectCode).map(str::to_owned),
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            created = report.created.len(),
            updated = report.updated.len(),
            failed = report.failed.len(),
            issues = report.issues.len(),
            "activity import finished"
        );
        report
    }

    /// Reads a CSV export and imports every row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskImportError::Csv`] only when the header line cannot be
    /// read; row-level problems end up in the report.
    pub async fn import_csv(
        &self,
        bytes: &[u8],
        options: CsvImportOptions,
        context: &ReconcileContext,
    ) -> Result<ImportReport, TaskImportError> {
        let rows = csv_adapter::read_rows(bytes, options)?;
        Ok(self.import_rows(rows, context).await)
    }
}
