//! Port contracts for activity import.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod catalog;
pub mod directory;
pub mod repository;

pub use catalog::{CatalogError, CatalogResult, StageCatalog, TagCatalog};
pub use directory::ReferenceDirectory;
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
