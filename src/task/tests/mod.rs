//! Unit tests for activity import.

mod support;
