//! Import settings loaded from a JSON file.
//!
//! Every field has a default, so an empty object (or no file at all) yields a
//! usable configuration. Command-line flags are applied on top by the binary.

use crate::task::{
    adapters::csv::CsvImportOptions,
    domain::{StageLabel, StandardStage, TaskDomainError},
    services::DuplicatePolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration file {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The configured default stage label is blank.
    #[error("invalid default stage: {0}")]
    DefaultStage(#[from] TaskDomainError),
}

/// Settings for one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// CSV reader options.
    pub csv: CsvImportOptions,
    /// Behaviour for rows matching an existing activity.
    pub duplicate_policy: DuplicatePolicy,
    /// Stage label used when a row's status is unknown and its project has
    /// no default stage.
    pub default_stage: String,
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv: CsvImportOptions::default(),
            duplicate_policy: DuplicatePolicy::default(),
            default_stage: StandardStage::ToDo.label().to_owned(),
            database_url: None,
        }
    }
}

impl ImportConfig {
    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the validated default stage label.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DefaultStage`] when the label is blank.
    pub fn default_stage_label(&self) -> Result<StageLabel, ConfigError> {
        Ok(StageLabel::new(&self.default_stage)?)
    }
}
