//! Donor pools and pool sets

use super::PoolName;
use crate::errors::{BughunterError, Result};
use crate::shared::models::{Ast, DiffId, HashMode, NodeHashes, NodeId, StructuralHash};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier-normalised or literal pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolVariant {
    Abstract,
    Concrete,
}

impl PoolVariant {
    pub const ALL: [PoolVariant; 2] = [PoolVariant::Abstract, PoolVariant::Concrete];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolVariant::Abstract => "abstract",
            PoolVariant::Concrete => "concrete",
        }
    }

    /// Hash space the variant's pools live in
    pub fn mode(&self) -> HashMode {
        match self {
            PoolVariant::Abstract => HashMode::Abstract,
            PoolVariant::Concrete => HashMode::Concrete,
        }
    }
}

impl fmt::Display for PoolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable set of structural hashes
///
/// Membership is by hash, independent of node identity or position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonorPool {
    hashes: BTreeSet<StructuralHash>,
}

impl DonorPool {
    pub fn new(hashes: impl IntoIterator<Item = StructuralHash>) -> Self {
        Self {
            hashes: hashes.into_iter().collect(),
        }
    }

    pub fn contains(&self, hash: &StructuralHash) -> bool {
        self.hashes.contains(hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructuralHash> {
        self.hashes.iter()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Donor pools of one diff, in one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorPoolSet {
    diff_id: DiffId,
    variant: PoolVariant,
    pools: BTreeMap<PoolName, DonorPool>,
}

impl DonorPoolSet {
    pub fn new(diff_id: DiffId, variant: PoolVariant, pools: BTreeMap<PoolName, DonorPool>) -> Self {
        Self {
            diff_id,
            variant,
            pools,
        }
    }

    pub fn diff_id(&self) -> &DiffId {
        &self.diff_id
    }

    pub fn variant(&self) -> PoolVariant {
        self.variant
    }

    pub fn pools(&self) -> &BTreeMap<PoolName, DonorPool> {
        &self.pools
    }

    pub fn pool(&self, name: PoolName) -> Option<&DonorPool> {
        self.pools.get(&name)
    }

    /// Whether `hash` is in any of the named pools
    pub fn contains_hash(&self, hash: &StructuralHash, pools: &[PoolName]) -> bool {
        pools
            .iter()
            .filter_map(|name| self.pools.get(name))
            .any(|pool| pool.contains(hash))
    }

    /// Whether a node of `ast` is in any of the named pools
    ///
    /// The node is hashed in this set's own mode.
    pub fn contains(&self, ast: &Ast, node: NodeId, pools: &[PoolName]) -> bool {
        let hashes = NodeHashes::compute(ast, self.variant.mode());
        self.contains_hash(&hashes.get(node), pools)
    }

    /// Like [`contains`](Self::contains) with hashes computed once by the
    /// caller; the hashes must be in this set's mode
    pub fn contains_hashed(
        &self,
        hashes: &NodeHashes,
        node: NodeId,
        pools: &[PoolName],
    ) -> Result<bool> {
        if hashes.mode() != self.variant.mode() {
            return Err(BughunterError::invalid_input(format!(
                "{:?} hashes queried against {} pools of {}",
                hashes.mode(),
                self.variant,
                self.diff_id
            )));
        }
        Ok(self.contains_hash(&hashes.get(node), pools))
    }

    /// Union of the named pools
    pub fn union(&self, pools: &[PoolName]) -> DonorPool {
        DonorPool::new(
            pools
                .iter()
                .filter_map(|name| self.pools.get(name))
                .flat_map(|pool| pool.iter().copied()),
        )
    }

    /// Pool sizes keyed by external name
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        self.pools
            .iter()
            .map(|(name, pool)| (name.as_str(), pool.len()))
            .collect()
    }
}
