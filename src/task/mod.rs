//! Activity tasks and their import from spreadsheet exports.
//!
//! A row is reconciled into [`domain::TaskDetails`] by
//! [`services::TaskImportReconciler`], then stored by
//! [`services::TaskImportService`], which also aggregates the per-run
//! [`services::ImportReport`]. [`services::TaskLifecycleService`] moves
//! stored tasks between stages afterwards. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
