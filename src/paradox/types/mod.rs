//! Foundational data structures, error types, and the decoded table model.

pub mod error;
pub mod models;
pub mod table;
