//! Domain model for activity import.
//!
//! The task domain models spreadsheet rows, the task aggregate, and the
//! tags, stages and read-only references a row resolves to, while keeping
//! all infrastructure concerns outside of the domain boundary.

mod deadline;
mod error;
mod ids;
mod project_code;
mod references;
mod row;
mod stage;
mod tag;
mod task;

pub use deadline::Deadline;
pub use error::{ParseTagCategoryError, TaskDomainError};
pub use ids::{CompanyId, ProjectId, StageId, TagId, TaskId, UserId};
pub use project_code::ProjectCode;
pub use references::{CompanyRef, ProjectRef, UserRef};
pub use row::{ImportColumn, ImportRow};
pub use stage::{Stage, StageLabel, StandardStage};
pub use tag::{Tag, TagCategory, TagLabel};
pub use task::{PersistedTaskData, Task, TaskDetails};
