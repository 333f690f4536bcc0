//! Donor pool builder
//!
//! One pass over the tree in pre-order. Arena ids are already pre-order, so
//! the pass is a plain loop and deep trees cannot overflow the stack.
//!
//! ```text
//! every node          → atomic
//! Block               → block
//! expression          → expression
//!   Assignment        → lhs(lhs child), rhs(rhs child)
//!   Identity          → identity
//!   FunctionCall      → call-target(target), call-arg(each argument)
//! other statement     → statement
//!   Switch            → switch-expr(expression)
//!   loop              → guard(condition)
//!     For             → for-init(init), for-after(after)
//!   IfElse            → guard(condition)
//! ```

use crate::features::donor_pool::domain::{DonorPool, PoolName};
use crate::shared::models::{Ast, HashMode, NodeCategory, NodeHashes, NodeId, NodeKind, StructuralHash};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Result of an incremental build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolBuildOutcome {
    /// Existing pools merged with the newly built ones
    pub pools: BTreeMap<PoolName, DonorPool>,
    /// Pools built by this call
    pub built: Vec<PoolName>,
    /// Whether the tree was walked at all
    pub traversed: bool,
}

#[derive(Debug, Default)]
pub struct DonorPoolBuilder;

impl DonorPoolBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the requested pools that `existing` lacks and merge them in
    ///
    /// When nothing is missing the tree is not walked and `existing` is
    /// returned unchanged.
    pub fn build(
        &self,
        ast: &Ast,
        mode: HashMode,
        existing: BTreeMap<PoolName, DonorPool>,
        requested: &[PoolName],
    ) -> PoolBuildOutcome {
        let mut buffers: BTreeMap<PoolName, BTreeSet<StructuralHash>> = requested
            .iter()
            .filter(|name| !existing.contains_key(name))
            .map(|name| (*name, BTreeSet::new()))
            .collect();

        if buffers.is_empty() {
            return PoolBuildOutcome {
                pools: existing,
                built: Vec::new(),
                traversed: false,
            };
        }

        let hashes = NodeHashes::compute(ast, mode);
        for node in ast.ids() {
            classify(ast, node, |pool, member| {
                if let Some(buffer) = buffers.get_mut(&pool) {
                    buffer.insert(hashes.get(member));
                }
            });
        }

        let built: Vec<PoolName> = buffers.keys().copied().collect();
        debug!(
            nodes = ast.len(),
            mode = ?mode,
            pools = ?built,
            "donor pools built"
        );

        let mut pools = existing;
        pools.extend(
            buffers
                .into_iter()
                .map(|(name, hashes)| (name, DonorPool::new(hashes))),
        );
        PoolBuildOutcome {
            pools,
            built,
            traversed: true,
        }
    }
}

/// Report every `(pool, node)` membership contributed by `node`
fn classify(ast: &Ast, node: NodeId, mut add: impl FnMut(PoolName, NodeId)) {
    add(PoolName::Atomic, node);

    let kind = ast.kind(node);
    if kind == NodeKind::Block {
        add(PoolName::Block, node);
        return;
    }

    match kind.category() {
        NodeCategory::Expression => {
            add(PoolName::Expression, node);
            match kind {
                NodeKind::Assignment => {
                    ast.lhs(node).into_iter().for_each(|n| add(PoolName::Lhs, n));
                    ast.rhs(node).into_iter().for_each(|n| add(PoolName::Rhs, n));
                }
                NodeKind::Identity => add(PoolName::Identity, node),
                NodeKind::FunctionCall => {
                    ast.call_target(node)
                        .into_iter()
                        .for_each(|n| add(PoolName::CallTarget, n));
                    for arg in ast.call_arguments(node) {
                        add(PoolName::CallArg, *arg);
                    }
                }
                _ => {}
            }
        }
        NodeCategory::Statement => {
            add(PoolName::Statement, node);
            match kind {
                NodeKind::Switch => {
                    ast.switch_expr(node)
                        .into_iter()
                        .for_each(|n| add(PoolName::SwitchExpr, n));
                }
                _ if kind.is_loop() => {
                    ast.condition(node).into_iter().for_each(|n| add(PoolName::Guard, n));
                    if kind == NodeKind::For {
                        ast.loop_init(node).into_iter().for_each(|n| add(PoolName::ForInit, n));
                        ast.loop_after(node).into_iter().for_each(|n| add(PoolName::ForAfter, n));
                    }
                }
                NodeKind::IfElse => {
                    ast.condition(node).into_iter().for_each(|n| add(PoolName::Guard, n));
                }
                _ => {}
            }
        }
        NodeCategory::Syntax => {}
    }
}
