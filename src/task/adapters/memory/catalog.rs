//! In-memory tag and stage catalogs.
//!
//! Each get-or-create runs its lookup and insert under one write lock, which
//! plays the role of the `(label, category)` unique index.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Stage, StageId, StageLabel, Tag, TagCategory, TagLabel},
    ports::{CatalogError, CatalogResult, StageCatalog, TagCatalog},
};

fn poisoned(err: impl ToString) -> CatalogError {
    CatalogError::persistence(std::io::Error::other(err.to_string()))
}

/// Thread-safe in-memory tag catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTagCatalog {
    tags: Arc<RwLock<BTreeMap<(TagCategory, TagLabel), Tag>>>,
}

impl InMemoryTagCatalog {
    /// Creates an empty tag catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tags across both categories.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the lock is poisoned.
    pub fn len(&self) -> CatalogResult<usize> {
        Ok(self.tags.read().map_err(poisoned)?.len())
    }

    /// Returns `true` when no tag has been created yet.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the lock is poisoned.
    pub fn is_empty(&self) -> CatalogResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl TagCatalog for InMemoryTagCatalog {
    async fn get_or_create(&self, label: &TagLabel, category: TagCategory) -> CatalogResult<Tag> {
        let mut tags = self.tags.write().map_err(poisoned)?;
        let tag = tags
            .entry((category, label.clone()))
            .or_insert_with(|| Tag::new(label.clone(), category));
        Ok(tag.clone())
    }

    async fn find(&self, label: &TagLabel, category: TagCategory) -> CatalogResult<Option<Tag>> {
        let tags = self.tags.read().map_err(poisoned)?;
        Ok(tags.get(&(category, label.clone())).cloned())
    }

    async fn list(&self, category: TagCategory) -> CatalogResult<Vec<Tag>> {
        let tags = self.tags.read().map_err(poisoned)?;
        Ok(tags
            .iter()
            .filter(|((tag_category, _), _)| *tag_category == category)
            .map(|(_, tag)| tag.clone())
            .collect())
    }
}

/// Thread-safe in-memory stage catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStageCatalog {
    stages: Arc<RwLock<Vec<Stage>>>,
}

impl InMemoryStageCatalog {
    /// Creates an empty stage catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stage, global or project-specific.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] when the lock is poisoned.
    pub fn register(&self, stage: Stage) -> CatalogResult<()> {
        self.stages.write().map_err(poisoned)?.push(stage);
        Ok(())
    }
}

fn is_global_with_label(stage: &Stage, label: &StageLabel) -> bool {
    stage.project().is_none() && stage.label().as_str().eq_ignore_ascii_case(label.as_str())
}

#[async_trait]
impl StageCatalog for InMemoryStageCatalog {
    async fn get_or_create(&self, label: &StageLabel) -> CatalogResult<Stage> {
        let mut stages = self.stages.write().map_err(poisoned)?;
        if let Some(existing) = stages.iter().find(|stage| is_global_with_label(stage, label)) {
            return Ok(existing.clone());
        }
        let created = Stage::new(label.clone());
        stages.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: StageId) -> CatalogResult<Option<Stage>> {
        let stages = self.stages.read().map_err(poisoned)?;
        Ok(stages.iter().find(|stage| stage.id() == id).cloned())
    }
}
