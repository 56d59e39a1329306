//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The activity name is empty after trimming.
    #[error("activity name must not be empty")]
    EmptyTaskName,

    /// The commessa code does not follow the `XXXXX-YY` format.
    #[error("invalid commessa code '{0}', expected XXXXX-YY (e.g. 00001-24)")]
    InvalidProjectCode(String),

    /// A tag label is empty after trimming.
    #[error("tag label must not be empty")]
    EmptyTagLabel,

    /// A stage label is empty after trimming.
    #[error("stage label must not be empty")]
    EmptyStageLabel,
}

/// Error returned while parsing tag categories from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown tag category: {0}")]
pub struct ParseTagCategoryError(pub String);
