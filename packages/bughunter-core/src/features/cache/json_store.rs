//! JSON file primitives shared by the action and pool caches

use super::error::{CacheError, CacheResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Read and parse a cache file; `Ok(None)` when it does not exist
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CacheResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::Io(e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| CacheError::Deserialization(format!("{}: {}", path.display(), e)))
}

/// Serialize `value` next to `path` and atomically rename it into place
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> CacheResult<()> {
    let data = serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let write_result = (|| -> CacheResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;
        Ok(())
    })();

    if write_result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    write_result
}
