//! Application services for activity import and task lifecycle.

mod import;
mod lifecycle;
mod reconcile;

pub use import::{
    DuplicatePolicy, ImportEntry, ImportFailure, ImportOutcome, ImportReport, RowImport,
    TaskImportError, TaskImportService,
};
pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
pub use reconcile::{
    ImportIssue, ImportIssueKind, ReconcileContext, ReconcileError, ReconciledTask,
    TaskImportReconciler,
};
