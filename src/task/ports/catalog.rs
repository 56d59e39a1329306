//! Get-or-create catalogs for tags and stages.

use crate::task::domain::{Stage, StageId, StageLabel, Tag, TagCategory, TagLabel};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog and directory operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Tag storage with idempotent creation.
#[async_trait]
pub trait TagCatalog: Send + Sync {
    /// Returns the tag with this label in this category, creating it when
    /// absent.
    ///
    /// Implementations must never hold two tags with the same
    /// `(label, category)` pair, even under concurrent calls.
    async fn get_or_create(&self, label: &TagLabel, category: TagCategory) -> CatalogResult<Tag>;

    /// Finds a tag without creating it.
    async fn find(&self, label: &TagLabel, category: TagCategory) -> CatalogResult<Option<Tag>>;

    /// Returns every tag in a category, ordered by label.
    async fn list(&self, category: TagCategory) -> CatalogResult<Vec<Tag>>;
}

/// Stage storage with a registered global default.
#[async_trait]
pub trait StageCatalog: Send + Sync {
    /// Returns the global stage with this label, creating it when absent.
    async fn get_or_create(&self, label: &StageLabel) -> CatalogResult<Stage>;

    /// Finds a stage by identifier.
    async fn find_by_id(&self, id: StageId) -> CatalogResult<Option<Stage>>;
}

/// Errors returned by catalog and directory implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
