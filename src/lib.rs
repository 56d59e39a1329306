//! Activity import: spreadsheet rows to ERP task records.
//!
//! The crate reads a CSV export of planned activities, resolves every column
//! against existing reference data (projects, users, companies, stages and
//! tags) and stores one task per row. Unresolvable references never reject a
//! row; they fall back to defaults and are reported for audit.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (CSV, memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Row reconciliation, batch import and stage moves
//! - [`config`]: JSON import settings

pub mod config;
pub mod task;
