//! Adapter implementations for activity import ports.

pub mod csv;
pub mod memory;
pub mod postgres;
