//! Cache-aware mining of one diff

use super::RepairActionRegistry;
use crate::errors::Result;
use crate::features::cache::CacheLayout;
use crate::features::repair_actions::domain::ActionSet;
use crate::features::repair_actions::infrastructure::{
    ActionCache, DetectionContext, TreeFingerprint,
};
use crate::shared::models::Diff;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of mining one diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineOutcome {
    Analyzed { actions: ActionSet, stats: MineStats },
    /// Nothing was analysed; not an error
    NotAnalyzable { reason: String },
}

impl MineOutcome {
    pub fn actions(&self) -> Option<&ActionSet> {
        match self {
            MineOutcome::Analyzed { actions, .. } => Some(actions),
            MineOutcome::NotAnalyzable { .. } => None,
        }
    }

    pub fn stats(&self) -> Option<&MineStats> {
        match self {
            MineOutcome::Analyzed { stats, .. } => Some(stats),
            MineOutcome::NotAnalyzable { .. } => None,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        matches!(self, MineOutcome::Analyzed { .. })
    }
}

/// Mining statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MineStats {
    /// Detectors actually invoked (categories missing from the cache)
    pub detectors_run: usize,
    /// Categories taken from the cache
    pub loaded_from_cache: usize,
    pub cache_written: bool,
}

/// Runs the registry's detectors over a diff, reusing cached categories
pub struct RepairActionMiner {
    registry: RepairActionRegistry,
    cache: Option<ActionCache>,
}

impl RepairActionMiner {
    pub fn new(registry: RepairActionRegistry, cache: Option<CacheLayout>) -> Self {
        Self {
            registry,
            cache: cache.map(ActionCache::new),
        }
    }

    /// In-memory miner with every built-in detector
    pub fn standard() -> Result<Self> {
        Ok(Self::new(RepairActionRegistry::standard()?, None))
    }

    pub fn registry(&self) -> &RepairActionRegistry {
        &self.registry
    }

    /// Mine every enabled category of `diff`
    ///
    /// Categories already in the cache are loaded, the rest are mined in
    /// dependency order. The cache is rewritten only when something new was
    /// mined, and never when a detector fails. The returned set holds the
    /// enabled categories only.
    pub fn mine(&self, diff: &Diff) -> Result<MineOutcome> {
        let Some(edits) = diff.edit_script() else {
            info!(diff = %diff.id(), "no edit script, skipping");
            return Ok(MineOutcome::NotAnalyzable {
                reason: "no edit script".to_string(),
            });
        };

        let start = Instant::now();
        let ctx = DetectionContext::new(diff, edits);
        let fingerprint = TreeFingerprint::of(&ctx)?;

        let mut actions = self.load_cached(diff, fingerprint);
        let mut stats = MineStats {
            loaded_from_cache: self
                .registry
                .kinds()
                .iter()
                .filter(|k| actions.contains(**k))
                .count(),
            ..MineStats::default()
        };

        for detector in self.registry.detectors() {
            let kind = detector.kind();
            if actions.contains(kind) {
                continue;
            }
            let found = detector.detect(&ctx, &actions)?;
            debug!(diff = %diff.id(), category = %kind, count = found.len(), "detector finished");
            actions.insert_category(kind, found)?;
            stats.detectors_run += 1;
        }

        if stats.detectors_run > 0 {
            if let Some(cache) = &self.cache {
                match cache.store(diff.id(), fingerprint, &actions) {
                    Ok(()) => stats.cache_written = true,
                    Err(e) => warn!(diff = %diff.id(), error = %e, "failed to write action cache"),
                }
            }
        }

        info!(
            diff = %diff.id(),
            detectors_run = stats.detectors_run,
            loaded_from_cache = stats.loaded_from_cache,
            actions = actions.action_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "repair actions mined"
        );

        Ok(MineOutcome::Analyzed {
            actions: actions.restricted_to(&self.registry.kinds()),
            stats,
        })
    }

    /// Cached categories, or an empty set on a miss or an unusable file
    fn load_cached(&self, diff: &Diff, fingerprint: TreeFingerprint) -> ActionSet {
        let Some(cache) = &self.cache else {
            return ActionSet::new();
        };

        match cache.load(diff, fingerprint) {
            Ok(Some(actions)) => actions,
            Ok(None) => ActionSet::new(),
            Err(e) => {
                warn!(
                    diff = %diff.id(),
                    path = %cache.path(diff.id()).display(),
                    error = %e,
                    "discarding unusable action cache"
                );
                ActionSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::repair_actions::domain::ActionKind;
    use crate::features::repair_actions::infrastructure::test_support::*;
    use crate::shared::models::{DiffId, EditOp};
    use tempfile::TempDir;

    fn appended_call() -> Diff {
        // f();  →  f(); g();
        let before = unit(vec![expr_stmt(call("f", vec![]))]);
        let after = unit(vec![expr_stmt(call("f", vec![])), expr_stmt(call("g", vec![]))]);
        let pairs = [("/", "/"), ("0", "0"), ("0/0", "0/0"), ("0/0/0", "0/0/0")];
        diff_with_paths(before, after, &pairs, |_, after| {
            vec![EditOp::Insert {
                inserted: after.at("1").unwrap(),
            }]
        })
    }

    #[test]
    fn test_missing_edit_script_is_not_analyzable() {
        let diff = appended_call();
        let diff = Diff::new(
            DiffId::new("r", "f", "a.c"),
            diff.before().clone(),
            diff.after().clone(),
            diff.correspondence().clone(),
            None,
        )
        .unwrap();

        let outcome = RepairActionMiner::standard().unwrap().mine(&diff).unwrap();
        assert!(!outcome.is_analyzed());
        assert!(outcome.actions().is_none());
    }

    #[test]
    fn test_every_enabled_category_is_present() {
        let outcome = RepairActionMiner::standard()
            .unwrap()
            .mine(&appended_call())
            .unwrap();

        let actions = outcome.actions().unwrap();
        assert_eq!(actions.len(), ActionKind::ALL.len());
        assert_eq!(actions.insert_statements().count(), 1);
        assert_eq!(outcome.stats().unwrap().detectors_run, ActionKind::ALL.len());
        assert!(!outcome.stats().unwrap().cache_written);
    }

    #[test]
    fn test_second_run_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let miner = RepairActionMiner::new(
            RepairActionRegistry::standard().unwrap(),
            Some(CacheLayout::new(dir.path())),
        );
        let diff = appended_call();

        let first = miner.mine(&diff).unwrap();
        let second = miner.mine(&diff).unwrap();

        assert!(first.stats().unwrap().cache_written);
        assert_eq!(second.stats().unwrap().detectors_run, 0);
        assert_eq!(second.stats().unwrap().loaded_from_cache, ActionKind::ALL.len());
        assert!(!second.stats().unwrap().cache_written);
        assert_eq!(first.actions(), second.actions());
    }

    #[test]
    fn test_cache_is_extended_with_missing_categories() {
        let dir = TempDir::new().unwrap();
        let layout = CacheLayout::new(dir.path());
        let diff = appended_call();

        let basic = RepairActionRegistry::with_kinds(&[
            ActionKind::DeleteStatement,
            ActionKind::InsertStatement,
            ActionKind::ModifyStatement,
        ])
        .unwrap();
        RepairActionMiner::new(basic, Some(layout.clone()))
            .mine(&diff)
            .unwrap();

        let full = RepairActionMiner::new(RepairActionRegistry::standard().unwrap(), Some(layout));
        let outcome = full.mine(&diff).unwrap();
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.loaded_from_cache, 3);
        assert_eq!(stats.detectors_run, ActionKind::ALL.len() - 3);
        assert!(stats.cache_written);
    }
}
