//! Donor pool cache
//!
//! One file per diff and variant, mapping pool name to the sorted hex
//! hashes of its members. Unknown pool names and malformed hashes fail to
//! parse and are reported as corrupt.

use crate::features::cache::{read_json, write_json_atomic, CacheLayout, CacheResult};
use crate::features::donor_pool::domain::{DonorPool, PoolName, PoolVariant};
use crate::shared::models::DiffId;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PoolCache {
    layout: CacheLayout,
}

impl PoolCache {
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    pub fn path(&self, id: &DiffId, variant: PoolVariant) -> PathBuf {
        self.layout.pool_path(id, variant)
    }

    pub fn load(
        &self,
        id: &DiffId,
        variant: PoolVariant,
    ) -> CacheResult<Option<BTreeMap<PoolName, DonorPool>>> {
        let pools = read_json::<BTreeMap<PoolName, DonorPool>>(&self.path(id, variant))?;
        debug!(
            diff = %id,
            variant = %variant,
            hit = pools.is_some(),
            "pool cache lookup"
        );
        Ok(pools)
    }

    pub fn store(
        &self,
        id: &DiffId,
        variant: PoolVariant,
        pools: &BTreeMap<PoolName, DonorPool>,
    ) -> CacheResult<()> {
        write_json_atomic(&self.path(id, variant), pools)
    }
}
