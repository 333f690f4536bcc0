//! Common test utilities for bughunter-core
//!
//! Tree builders, a path-based diff builder, and the reference scenarios
//! shared by the integration tests.

#![allow(dead_code)]

mod builders;
mod fixtures;

pub use builders::*;
pub use fixtures::*;
