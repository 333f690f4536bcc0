//! Repair action registry: the validated, ordered set of detectors

use crate::errors::Result;
use crate::features::repair_actions::domain::ActionKind;
use crate::features::repair_actions::infrastructure::*;
use crate::pipeline::DetectorDag;
use tracing::debug;

/// Detectors of one mining configuration, in execution order
///
/// Building a registry validates the dependency DAG, so a registry that
/// exists can always run to completion without a missing prerequisite.
pub struct RepairActionRegistry {
    detectors: Vec<Box<dyn RepairActionDetector>>,
    dag: DetectorDag,
}

impl RepairActionRegistry {
    /// All 25 built-in detectors
    pub fn standard() -> Result<Self> {
        Self::with_kinds(&ActionKind::ALL)
    }

    /// Built-in detectors for a subset of categories
    ///
    /// The subset must be closed under dependencies.
    pub fn with_kinds(kinds: &[ActionKind]) -> Result<Self> {
        Self::from_detectors(kinds.iter().map(|kind| builtin_detector(*kind)).collect())
    }

    /// Arbitrary detectors, reordered topologically
    pub fn from_detectors(mut detectors: Vec<Box<dyn RepairActionDetector>>) -> Result<Self> {
        let kinds: Vec<ActionKind> = detectors.iter().map(|d| d.kind()).collect();
        let dag = DetectorDag::build(&kinds)?;

        let order = dag.execution_order();
        detectors.sort_by_key(|d| order.iter().position(|k| *k == d.kind()));

        debug!(
            detectors = dag.detector_count(),
            dependencies = dag.dependency_count(),
            "detector registry built"
        );
        Ok(Self { detectors, dag })
    }

    /// Categories in execution order
    pub fn kinds(&self) -> Vec<ActionKind> {
        self.detectors.iter().map(|d| d.kind()).collect()
    }

    pub fn detectors(&self) -> impl Iterator<Item = &dyn RepairActionDetector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn dag(&self) -> &DetectorDag {
        &self.dag
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

fn builtin_detector(kind: ActionKind) -> Box<dyn RepairActionDetector> {
    match kind {
        ActionKind::DeleteStatement => Box::new(DeleteStatementDetector),
        ActionKind::InsertStatement => Box::new(InsertStatementDetector),
        ActionKind::ModifyStatement => Box::new(ModifyStatementDetector),
        ActionKind::WrapStatement => Box::new(WrapStatementDetector),
        ActionKind::UnwrapStatement => Box::new(UnwrapStatementDetector),
        ActionKind::ReplaceIfCondition => Box::new(ReplaceIfConditionDetector),
        ActionKind::ReplaceThenBranch => Box::new(ReplaceThenBranchDetector),
        ActionKind::ReplaceElseBranch => Box::new(ReplaceElseBranchDetector),
        ActionKind::RemoveElseBranch => Box::new(RemoveElseBranchDetector),
        ActionKind::InsertElseBranch => Box::new(InsertElseBranchDetector),
        ActionKind::InsertElseIfBranch => Box::new(InsertElseIfBranchDetector),
        ActionKind::GuardElseBranch => Box::new(GuardElseBranchDetector),
        ActionKind::ReplaceSwitchExpression => Box::new(ReplaceSwitchExpressionDetector),
        ActionKind::ReplaceLoopGuard => Box::new(ReplaceLoopGuardDetector),
        ActionKind::ReplaceLoopBody => Box::new(ReplaceLoopBodyDetector),
        ActionKind::ModifyAssignment => Box::new(ModifyAssignmentDetector),
        ActionKind::ReplaceAssignmentRhs => Box::new(ReplaceAssignmentRhsDetector),
        ActionKind::ReplaceAssignmentLhs => Box::new(ReplaceAssignmentLhsDetector),
        ActionKind::ReplaceAssignmentOp => Box::new(ReplaceAssignmentOpDetector),
        ActionKind::ModifyCall => Box::new(ModifyCallDetector),
        ActionKind::ReplaceCallTarget => Box::new(ReplaceCallTargetDetector),
        ActionKind::ModifyCallArgs => Box::new(ModifyCallArgsDetector),
        ActionKind::InsertCallArg => Box::new(InsertCallArgDetector),
        ActionKind::RemoveCallArg => Box::new(RemoveCallArgDetector),
        ActionKind::ReplaceCallArg => Box::new(ReplaceCallArgDetector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BughunterError;

    #[test]
    fn test_standard_registry_covers_every_kind() {
        let registry = RepairActionRegistry::standard().unwrap();
        assert_eq!(registry.len(), ActionKind::ALL.len());
        for kind in ActionKind::ALL {
            assert!(registry.kinds().contains(&kind));
        }
    }

    #[test]
    fn test_every_detector_reports_its_own_kind() {
        for kind in ActionKind::ALL {
            assert_eq!(builtin_detector(kind).kind(), kind);
        }
    }

    #[test]
    fn test_detectors_run_after_their_prerequisites() {
        let registry = RepairActionRegistry::with_kinds(&[
            ActionKind::InsertCallArg,
            ActionKind::ModifyCallArgs,
            ActionKind::ModifyCall,
            ActionKind::ModifyStatement,
        ])
        .unwrap();

        assert_eq!(
            registry.kinds(),
            vec![
                ActionKind::ModifyStatement,
                ActionKind::ModifyCall,
                ActionKind::ModifyCallArgs,
                ActionKind::InsertCallArg,
            ]
        );
    }

    #[test]
    fn test_subset_must_be_dependency_closed() {
        let result = RepairActionRegistry::with_kinds(&[ActionKind::WrapStatement]);
        assert!(matches!(
            result,
            Err(BughunterError::DependencyMissing {
                detector: ActionKind::WrapStatement,
                ..
            })
        ));
    }
}
