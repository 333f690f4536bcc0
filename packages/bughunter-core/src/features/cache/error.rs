//! Error types for the on-disk caches

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache corrupted: {0}")]
    Corrupted(String),

    #[error("Cache version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache was written for different trees than the ones being analysed
    #[error("Stale fingerprint: {0}")]
    InvalidFingerprint(String),
}

impl CacheError {
    /// Every variant except a plain I/O failure means the file content
    /// cannot be trusted and should be recomputed
    pub fn is_corruption(&self) -> bool {
        !matches!(self, CacheError::Io(_) | CacheError::Serialization(_))
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
