//! Task stages and spreadsheet status normalization.
//!
//! Stage labels form an open set: any label may be registered, and four
//! standard labels carry meaning for the importer and the "toggle
//! completed" action.

use super::{ProjectId, StageId, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four stage labels the importer knows how to map status values onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardStage {
    /// "Completata": the activity is done.
    Completed,
    /// "Da fare": the activity is still to do.
    ToDo,
    /// "In corso": the activity is in progress.
    InProgress,
    /// "Annullata": the activity was cancelled.
    Cancelled,
}

impl StandardStage {
    /// All standard stages, in display order.
    pub const ALL: [Self; 4] = [Self::ToDo, Self::InProgress, Self::Completed, Self::Cancelled];

    /// Returns the stage label as stored.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completata",
            Self::ToDo => "Da fare",
            Self::InProgress => "In corso",
            Self::Cancelled => "Annullata",
        }
    }

    /// Maps a spreadsheet status value onto a standard stage.
    ///
    /// Matching ignores case and surrounding whitespace. Returns `None` for
    /// empty or unknown values; the caller then falls back to a default
    /// stage.
    #[must_use]
    pub fn from_status(value: &str) -> Option<Self> {
        let normalized = value.trim().to_uppercase();
        match normalized.as_str() {
            "FATTA" | "DONE" | "COMPLETATA" | "COMPLETED" => Some(Self::Completed),
            "DA FARE" | "TO DO" => Some(Self::ToDo),
            "IN CORSO" | "IN PROGRESS" => Some(Self::InProgress),
            "ANNULLATA" | "CANCELLED" | "CANCELED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns whether tasks in this stage are hidden from active boards.
    #[must_use]
    pub const fn is_folded(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for StandardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Validated, trimmed stage label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageLabel(String);

impl StageLabel {
    /// Creates a validated stage label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyStageLabel`] if the trimmed label is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyStageLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the standard stage this label names, if any.
    #[must_use]
    pub fn standard(&self) -> Option<StandardStage> {
        StandardStage::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(&self.0))
    }
}

impl From<StandardStage> for StageLabel {
    fn from(value: StandardStage) -> Self {
        Self(value.label().to_owned())
    }
}

impl AsRef<str> for StageLabel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A workflow stage tasks can be placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    id: StageId,
    label: StageLabel,
    project: Option<ProjectId>,
    folded: bool,
}

impl Stage {
    /// Creates a new global stage.
    #[must_use]
    pub fn new(label: StageLabel) -> Self {
        let folded = label.standard().is_some_and(StandardStage::is_folded);
        Self {
            id: StageId::new(),
            label,
            project: None,
            folded,
        }
    }

    /// Reconstructs a stage from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: StageId,
        label: StageLabel,
        project: Option<ProjectId>,
        folded: bool,
    ) -> Self {
        Self {
            id,
            label,
            project,
            folded,
        }
    }

    /// Scopes the stage to a single project.
    #[must_use]
    pub const fn for_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Returns the stage identifier.
    #[must_use]
    pub const fn id(&self) -> StageId {
        self.id
    }

    /// Returns the stage label.
    #[must_use]
    pub const fn label(&self) -> &StageLabel {
        &self.label
    }

    /// Returns the owning project for project-specific stages.
    #[must_use]
    pub const fn project(&self) -> Option<ProjectId> {
        self.project
    }

    /// Returns whether the stage is folded on boards.
    #[must_use]
    pub const fn is_folded(&self) -> bool {
        self.folded
    }
}
