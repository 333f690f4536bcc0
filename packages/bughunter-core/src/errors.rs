//! Error types for bughunter-core
//!
//! Provides unified error handling across the crate.

use crate::config::ConfigError;
use crate::features::cache::CacheError;
use crate::features::repair_actions::ActionKind;
use crate::shared::models::CorrespondenceError;
use thiserror::Error;

/// Main error type for bughunter-core operations
#[derive(Debug, Error)]
pub enum BughunterError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Diff input does not describe consistent trees
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Node correspondence is malformed
    #[error("Correspondence error: {0}")]
    Correspondence(#[from] CorrespondenceError),

    /// A detector ran (or was registered) before its prerequisite category
    #[error("Detector {detector} requires category {missing}, which has not been mined")]
    DependencyMissing {
        detector: ActionKind,
        missing: ActionKind,
    },

    /// Pipeline wiring error (cycles, duplicate categories)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cache error that could not be recovered locally
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl BughunterError {
    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        BughunterError::InvalidInput(msg.into())
    }

    /// Create a pipeline error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        BughunterError::Pipeline(msg.into())
    }
}

/// Result type alias for bughunter operations
pub type Result<T> = std::result::Result<T, BughunterError>;
