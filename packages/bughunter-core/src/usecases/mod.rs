//! Usecase layer
//!
//! Orchestrates features for one diff; binaries and embedding callers
//! should go through here rather than the feature modules.

pub mod fix_analysis;

pub use fix_analysis::{FixAnalysis, FixAnalysisReport, FixAnalysisService};
