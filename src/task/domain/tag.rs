//! Task tags and their two classification categories.

use super::{ParseTagCategoryError, TagId, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag category. A label may exist once per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// General nature of the activity ("Macro tipo").
    MacroType,
    /// Specific kind of activity ("Tipo attività").
    ActivityType,
}

impl TagCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MacroType => "macro_type",
            Self::ActivityType => "activity_type",
        }
    }
}

impl TryFrom<&str> for TagCategory {
    type Error = ParseTagCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "macro_type" => Ok(Self::MacroType),
            "activity_type" => Ok(Self::ActivityType),
            _ => Err(ParseTagCategoryError(value.to_owned())),
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated, trimmed tag label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagLabel(String);

impl TagLabel {
    /// Creates a validated tag label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTagLabel`] if the trimmed label is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTagLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Splits a comma-separated cell into labels.
    ///
    /// Whitespace around each label is dropped, as are empty segments, and
    /// repeated labels are kept once in first-seen order.
    #[must_use]
    pub fn split_list(value: &str) -> Vec<Self> {
        let mut labels: Vec<Self> = Vec::new();
        for label in value.split(',').filter_map(|segment| Self::new(segment).ok()) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagLabel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TagLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tag attached to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    label: TagLabel,
    category: TagCategory,
}

impl Tag {
    /// Creates a new tag with a fresh identifier.
    #[must_use]
    pub fn new(label: TagLabel, category: TagCategory) -> Self {
        Self {
            id: TagId::new(),
            label,
            category,
        }
    }

    /// Reconstructs a tag from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: TagId, label: TagLabel, category: TagCategory) -> Self {
        Self {
            id,
            label,
            category,
        }
    }

    /// Returns the tag identifier.
    #[must_use]
    pub const fn id(&self) -> TagId {
        self.id
    }

    /// Returns the tag label.
    #[must_use]
    pub const fn label(&self) -> &TagLabel {
        &self.label
    }

    /// Returns the tag category.
    #[must_use]
    pub const fn category(&self) -> TagCategory {
        self.category
    }
}
