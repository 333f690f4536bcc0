//! Shared module - Common types and utilities
//!
//! This module contains the tree model shared by every feature.
//! The trees themselves come from an external differ; nothing here parses source.

pub mod models;
pub mod utils;

// Re-exports for convenience
pub use models::*;
pub use utils::statement_locator::{nearest_enclosing_statement, nearest_mapped_statement};
