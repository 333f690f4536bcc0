//! Shared utilities

pub mod statement_locator;
