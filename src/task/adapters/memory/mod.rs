//! In-memory adapters used by tests and embedded callers.

mod catalog;
mod directory;
mod task;

pub use catalog::{InMemoryStageCatalog, InMemoryTagCatalog};
pub use directory::InMemoryReferenceDirectory;
pub use task::InMemoryTaskRepository;
