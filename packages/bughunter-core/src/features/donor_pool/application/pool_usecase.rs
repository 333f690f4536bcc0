//! Donor pool UseCase: cache-aware construction of a diff's pool sets

use crate::features::cache::CacheLayout;
use crate::features::donor_pool::domain::{DonorPool, DonorPoolSet, PoolName, PoolVariant};
use crate::features::donor_pool::infrastructure::{DonorPoolBuilder, PoolCache};
use crate::shared::models::Diff;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Pool set of one variant plus what it took to produce it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorPoolOutcome {
    pub pools: DonorPoolSet,
    pub built: Vec<PoolName>,
    pub traversed: bool,
    pub cache_written: bool,
}

/// Builds the donor pools of a diff's before-tree
pub struct DonorPoolService {
    builder: DonorPoolBuilder,
    cache: Option<PoolCache>,
    requested: Vec<PoolName>,
}

impl DonorPoolService {
    /// Service building every pool
    pub fn new(cache: Option<CacheLayout>) -> Self {
        Self::with_pools(cache, &PoolName::ALL)
    }

    pub fn with_pools(cache: Option<CacheLayout>, requested: &[PoolName]) -> Self {
        Self {
            builder: DonorPoolBuilder::new(),
            cache: cache.map(PoolCache::new),
            requested: requested.to_vec(),
        }
    }

    pub fn requested(&self) -> &[PoolName] {
        &self.requested
    }

    /// Pools of `diff` in one variant
    ///
    /// Cached pools are reused; only requested pools missing from the cache
    /// are built, and the cache is rewritten only if something was built.
    pub fn build(&self, diff: &Diff, variant: PoolVariant) -> DonorPoolOutcome {
        let existing = self.load_cached(diff, variant);
        let outcome = self
            .builder
            .build(diff.before(), variant.mode(), existing, &self.requested);

        let mut cache_written = false;
        if !outcome.built.is_empty() {
            if let Some(cache) = &self.cache {
                match cache.store(diff.id(), variant, &outcome.pools) {
                    Ok(()) => cache_written = true,
                    Err(e) => {
                        warn!(diff = %diff.id(), variant = %variant, error = %e, "failed to write pool cache")
                    }
                }
            }
        }

        info!(
            diff = %diff.id(),
            variant = %variant,
            built = outcome.built.len(),
            traversed = outcome.traversed,
            "donor pools ready"
        );

        DonorPoolOutcome {
            pools: DonorPoolSet::new(diff.id().clone(), variant, outcome.pools),
            built: outcome.built,
            traversed: outcome.traversed,
            cache_written,
        }
    }

    /// Abstract and concrete pools of `diff`
    pub fn build_all(&self, diff: &Diff) -> (DonorPoolOutcome, DonorPoolOutcome) {
        (
            self.build(diff, PoolVariant::Abstract),
            self.build(diff, PoolVariant::Concrete),
        )
    }

    fn load_cached(&self, diff: &Diff, variant: PoolVariant) -> BTreeMap<PoolName, DonorPool> {
        let Some(cache) = &self.cache else {
            return BTreeMap::new();
        };

        match cache.load(diff.id(), variant) {
            Ok(pools) => pools.unwrap_or_default(),
            Err(e) => {
                warn!(
                    diff = %diff.id(),
                    path = %cache.path(diff.id(), variant).display(),
                    error = %e,
                    "discarding unusable pool cache"
                );
                BTreeMap::new()
            }
        }
    }
}
