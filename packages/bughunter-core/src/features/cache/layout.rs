//! Cache path layout
//!
//! ```text
//! <root>/artefacts/<repository>/<fix>/<stem>.actions.json
//! <root>/artefacts/<repository>/<fix>/<stem>.abstract.pool.json
//! <root>/artefacts/<repository>/<fix>/<stem>.concrete.pool.json
//! ```

use crate::features::donor_pool::PoolVariant;
use crate::shared::models::DiffId;
use std::path::{Path, PathBuf};

const ARTEFACTS_DIR: &str = "artefacts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every artefact of one fix
    pub fn fix_dir(&self, id: &DiffId) -> PathBuf {
        self.root
            .join(ARTEFACTS_DIR)
            .join(path_component(&id.repository))
            .join(path_component(&id.fix))
    }

    pub fn actions_path(&self, id: &DiffId) -> PathBuf {
        self.fix_dir(id)
            .join(format!("{}.actions.json", id.file_stem()))
    }

    pub fn pool_path(&self, id: &DiffId, variant: PoolVariant) -> PathBuf {
        self.fix_dir(id)
            .join(format!("{}.{}.pool.json", id.file_stem(), variant.as_str()))
    }
}

/// Identifier usable as one directory name, never escaping its parent
fn path_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => format!("_{}", cleaned),
        _ => cleaned,
    }
}
