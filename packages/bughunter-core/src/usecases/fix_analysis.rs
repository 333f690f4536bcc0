//! Fix Analysis UseCase
//!
//! Per-diff entry point combining the fix filter, repair action mining and
//! donor pool construction under one [`MinerConfig`].

use crate::config::MinerConfig;
use crate::errors::Result;
use crate::features::donor_pool::{DonorPoolOutcome, DonorPoolService};
use crate::features::repair_actions::{
    MineOutcome, MineStats, RepairActionMiner, RepairActionRegistry,
};
use crate::shared::models::{Diff, DiffId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Everything learned about one diff
#[derive(Debug, Clone)]
pub struct FixAnalysis {
    pub diff_id: DiffId,
    pub outcome: MineOutcome,
    /// `(abstract, concrete)`; only for analysed diffs when pools were requested
    pub pools: Option<(DonorPoolOutcome, DonorPoolOutcome)>,
}

impl FixAnalysis {
    /// JSON-friendly summary
    pub fn report(&self) -> FixAnalysisReport {
        let (status, reason, actions, stats) = match &self.outcome {
            MineOutcome::Analyzed { actions, stats } => {
                ("analyzed", None, Some(actions.summary()), Some(*stats))
            }
            MineOutcome::NotAnalyzable { reason } => {
                ("not_analyzable", Some(reason.clone()), None, None)
            }
        };

        FixAnalysisReport {
            diff: self.diff_id.to_string(),
            status,
            reason,
            actions,
            stats,
            pools: self.pools.as_ref().map(|(abstract_, concrete)| {
                BTreeMap::from([
                    ("abstract", abstract_.pools.summary()),
                    ("concrete", concrete.pools.summary()),
                ])
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FixAnalysisReport {
    pub diff: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<&'static str, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MineStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pools: Option<BTreeMap<&'static str, BTreeMap<&'static str, usize>>>,
}

pub struct FixAnalysisService {
    config: MinerConfig,
    miner: RepairActionMiner,
    pools: DonorPoolService,
}

impl FixAnalysisService {
    pub fn new(config: MinerConfig) -> Result<Self> {
        config.validate()?;

        let registry = RepairActionRegistry::with_kinds(&config.detector_kinds())?;
        let miner = RepairActionMiner::new(registry, config.cache_layout());
        let pools = DonorPoolService::with_pools(config.cache_layout(), &config.pool_names());

        Ok(Self {
            config,
            miner,
            pools,
        })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Why the fix a diff belongs to is skipped, if it is
    pub fn skip_reason(&self, diff: &Diff) -> Option<String> {
        let files = diff.fix_files();
        let filter = &self.config.fix_filter;

        if filter.skip_header_fixes && files.modifies_header_file() {
            return Some("fix modifies a header file".to_string());
        }
        if filter.skip_multi_file_fixes && files.source_file_count() > 1 {
            return Some(format!(
                "fix modifies {} source files",
                files.source_file_count()
            ));
        }
        None
    }

    /// Mine repair actions and, if asked, build both pool variants
    pub fn analyze(&self, diff: &Diff, build_pools: bool) -> Result<FixAnalysis> {
        let outcome = match self.skip_reason(diff) {
            Some(reason) => {
                info!(diff = %diff.id(), %reason, "fix skipped");
                MineOutcome::NotAnalyzable { reason }
            }
            None => self.miner.mine(diff)?,
        };

        let pools = (build_pools && outcome.is_analyzed()).then(|| self.pools.build_all(diff));

        Ok(FixAnalysis {
            diff_id: diff.id().clone(),
            outcome,
            pools,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Ast, Correspondence, FixFiles, NodeKind, TreeNode};

    fn diff(files: &[&str]) -> Diff {
        let ast = Ast::from_tree(
            TreeNode::new(NodeKind::TranslationUnit).with_child(TreeNode::new(NodeKind::Empty)),
        );
        Diff::new(
            DiffId::new("r", "f", "a.c"),
            ast.clone(),
            ast,
            Correspondence::new(),
            Some(vec![]),
        )
        .unwrap()
        .with_fix_files(FixFiles(files.iter().map(|f| f.to_string()).collect()))
    }

    #[test]
    fn test_header_fix_is_skipped() {
        let service = FixAnalysisService::new(MinerConfig::default()).unwrap();
        let analysis = service.analyze(&diff(&["a.c", "a.h"]), true).unwrap();

        assert!(!analysis.outcome.is_analyzed());
        assert!(analysis.pools.is_none());
        assert_eq!(analysis.report().status, "not_analyzable");
    }

    #[test]
    fn test_multi_file_fix_is_skipped_unless_allowed() {
        let files = ["a.c", "b.c"];
        let strict = FixAnalysisService::new(MinerConfig::default()).unwrap();
        assert!(strict.skip_reason(&diff(&files)).is_some());

        let mut config = MinerConfig::default();
        config.fix_filter.skip_multi_file_fixes = false;
        let lenient = FixAnalysisService::new(config).unwrap();
        assert!(lenient.skip_reason(&diff(&files)).is_none());
    }

    #[test]
    fn test_report_of_analysed_fix() {
        let service = FixAnalysisService::new(MinerConfig::default()).unwrap();
        let report = service.analyze(&diff(&["a.c"]), true).unwrap().report();

        assert_eq!(report.status, "analyzed");
        assert_eq!(report.actions.as_ref().map(|a| a.len()), Some(25));
        let pools = report.pools.unwrap();
        assert_eq!(pools["abstract"].len(), 13);
        assert_eq!(pools["concrete"].len(), 13);
    }
}
