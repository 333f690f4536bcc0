//! Repair Action Detectors
//!
//! One detector per category, grouped by the construct they reason about:
//! - basic: statement deletion, insertion, modification
//! - if_else: guards and branches of if-statements
//! - switch / loops: switch expressions, loop guards and bodies
//! - assignment / call: expression-level edits inside modified statements
//!
//! `action_cache` persists a mined [`ActionSet`] per diff.
//!
//! Every detector reads the shared [`DetectionContext`] plus the categories
//! mined before it, and returns exactly its own category.

use crate::errors::Result;
use crate::features::repair_actions::domain::{ActionKind, ActionSet, RepairAction};
use crate::shared::models::{
    Ast, Correspondence, Diff, EditOp, HashMode, NodeHashes, NodeId, NodeKind,
};
use std::collections::BTreeMap;

pub mod action_cache;
pub mod assignment;
pub mod basic;
pub mod call;
pub mod if_else;
pub mod loops;
pub mod switch;

pub use action_cache::{ActionCache, TreeFingerprint, ACTION_CACHE_VERSION};
pub use assignment::{
    ModifyAssignmentDetector, ReplaceAssignmentLhsDetector, ReplaceAssignmentOpDetector,
    ReplaceAssignmentRhsDetector,
};
pub use basic::{DeleteStatementDetector, InsertStatementDetector, ModifyStatementDetector};
pub use call::{
    InsertCallArgDetector, ModifyCallArgsDetector, ModifyCallDetector, RemoveCallArgDetector,
    ReplaceCallArgDetector, ReplaceCallTargetDetector,
};
pub use if_else::{
    GuardElseBranchDetector, InsertElseBranchDetector, InsertElseIfBranchDetector,
    RemoveElseBranchDetector, ReplaceElseBranchDetector, ReplaceIfConditionDetector,
    ReplaceThenBranchDetector, UnwrapStatementDetector, WrapStatementDetector,
};
pub use loops::{ReplaceLoopBodyDetector, ReplaceLoopGuardDetector};
pub use switch::ReplaceSwitchExpressionDetector;

/// Repair action detector trait
///
/// A detector is a pure function of the context and of the categories it
/// depends on; it must not read any other category.
pub trait RepairActionDetector: Send + Sync {
    /// Category this detector produces
    fn kind(&self) -> ActionKind;

    /// Detect every action of this detector's category
    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>>;
}

/// Read-only inputs shared by all detectors of one mining run
pub struct DetectionContext<'a> {
    diff: &'a Diff,
    edits: &'a [EditOp],
    before_statements: Vec<NodeId>,
    after_statements: Vec<NodeId>,
    before_hashes: NodeHashes,
    after_hashes: NodeHashes,
}

impl<'a> DetectionContext<'a> {
    pub fn new(diff: &'a Diff, edits: &'a [EditOp]) -> Self {
        Self {
            diff,
            edits,
            before_statements: diff.before().statements(),
            after_statements: diff.after().statements(),
            before_hashes: NodeHashes::compute(diff.before(), HashMode::Concrete),
            after_hashes: NodeHashes::compute(diff.after(), HashMode::Concrete),
        }
    }

    pub fn diff(&self) -> &'a Diff {
        self.diff
    }

    pub fn before(&self) -> &'a Ast {
        self.diff.before()
    }

    pub fn after(&self) -> &'a Ast {
        self.diff.after()
    }

    pub fn correspondence(&self) -> &'a Correspondence {
        self.diff.correspondence()
    }

    pub fn edits(&self) -> &'a [EditOp] {
        self.edits
    }

    /// Statements of the before-tree, in pre-order
    pub fn before_statements(&self) -> &[NodeId] {
        &self.before_statements
    }

    /// Statements of the after-tree, in pre-order
    pub fn after_statements(&self) -> &[NodeId] {
        &self.after_statements
    }

    pub fn before_hashes(&self) -> &NodeHashes {
        &self.before_hashes
    }

    pub fn after_hashes(&self) -> &NodeHashes {
        &self.after_hashes
    }

    /// After-tree counterpart of a before-node
    pub fn after_of(&self, before: NodeId) -> Option<NodeId> {
        self.correspondence().after(before)
    }

    /// Before-tree counterpart of an after-node
    pub fn before_of(&self, after: NodeId) -> Option<NodeId> {
        self.correspondence().before(after)
    }

    /// Structural equivalence of a before-node and an after-node
    ///
    /// Ignores positions but not identifier names. An absent node is only
    /// equivalent to another absent node.
    pub fn equivalent(&self, before: Option<NodeId>, after: Option<NodeId>) -> bool {
        match (before, after) {
            (Some(b), Some(a)) => self.before_hashes.get(b) == self.after_hashes.get(a),
            (None, None) => true,
            _ => false,
        }
    }

    /// Element-wise equivalence of two node lists
    pub fn equivalent_lists(&self, before: &[NodeId], after: &[NodeId]) -> bool {
        before.len() == after.len()
            && before
                .iter()
                .zip(after)
                .all(|(b, a)| self.equivalent(Some(*b), Some(*a)))
    }
}

/// `(before, after)` statement pairs of every ModifyStatement action
pub(crate) fn modified_pairs(
    actions: &ActionSet,
    detector: ActionKind,
) -> Result<Vec<(NodeId, NodeId)>> {
    use crate::features::repair_actions::domain::repair_action::ModifyStatement;

    Ok(actions
        .require_of::<ModifyStatement>(detector)?
        .into_iter()
        .map(|m| (m.from, m.to))
        .collect())
}

/// Expressions of `kind` inside modified statements whose counterpart is
/// not equivalent, as `(before, after)` pairs ordered by before-id
///
/// Nested modified statements share subtrees, so each expression is
/// reported once.
pub(crate) fn modified_expressions(
    ctx: &DetectionContext<'_>,
    actions: &ActionSet,
    detector: ActionKind,
    kind: NodeKind,
) -> Result<Vec<(NodeId, NodeId)>> {
    let (before, after) = (ctx.before(), ctx.after());
    let mut found = BTreeMap::new();

    for (stmt, _) in modified_pairs(actions, detector)? {
        for node in before.subtree(stmt) {
            if before.kind(node) != kind || found.contains_key(&node) {
                continue;
            }
            let Some(counterpart) = ctx.after_of(node) else {
                continue;
            };
            if after.kind(counterpart) == kind && !ctx.equivalent(Some(node), Some(counterpart)) {
                found.insert(node, counterpart);
            }
        }
    }
    Ok(found.into_iter().collect())
}
