//! Loop detectors: guards and bodies of while, do-while and for loops

use super::{modified_pairs, DetectionContext, RepairActionDetector};
use crate::errors::Result;
use crate::features::repair_actions::domain::repair_action::{ReplaceLoopBody, ReplaceLoopGuard};
use crate::features::repair_actions::domain::{ActionKind, ActionSet, RepairAction};
use crate::shared::models::{Ast, NodeId, NodeKind, Role};
use std::collections::BTreeSet;

/// Modified loops whose guard is not equivalent
///
/// The guard of a for-loop is a statement of its own, so a modification
/// of it is promoted to the owning loop. Each loop is reported once.
pub struct ReplaceLoopGuardDetector;

impl RepairActionDetector for ReplaceLoopGuardDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceLoopGuard
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());
        let mut seen = BTreeSet::new();
        let mut found = Vec::new();

        for (b, a) in modified_pairs(actions, self.kind())? {
            let from_stmt = owning_for_loop(before, b);
            let to_stmt = owning_for_loop(after, a);
            if !(before.kind(from_stmt).is_loop() && after.kind(to_stmt).is_loop()) {
                continue;
            }
            if !seen.insert((from_stmt, to_stmt)) {
                continue;
            }

            let from_guard = before.condition(from_stmt);
            let to_guard = after.condition(to_stmt);
            if !ctx.equivalent(from_guard, to_guard) {
                found.push(
                    ReplaceLoopGuard {
                        from_stmt,
                        to_stmt,
                        from_guard,
                        to_guard,
                    }
                    .into(),
                );
            }
        }
        Ok(found)
    }
}

/// The for-loop whose guard `stmt` is, or `stmt` itself
fn owning_for_loop(ast: &Ast, stmt: NodeId) -> NodeId {
    if ast.role(stmt) != Some(Role::Condition) {
        return stmt;
    }
    match ast.parent(stmt) {
        Some(parent) if ast.kind(parent) == NodeKind::For => parent,
        _ => stmt,
    }
}

/// Surviving loops whose body is not equivalent
pub struct ReplaceLoopBodyDetector;

impl RepairActionDetector for ReplaceLoopBodyDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceLoopBody
    }

    fn detect(&self, ctx: &DetectionContext<'_>, _actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(ctx
            .after_statements()
            .iter()
            .copied()
            .filter(|a| after.kind(*a).is_loop())
            .filter_map(|to_stmt| {
                let from_stmt = ctx.before_of(to_stmt)?;
                if !before.kind(from_stmt).is_loop() {
                    return None;
                }
                let from_body = before.body(from_stmt)?;
                let to_body = after.body(to_stmt)?;
                (!ctx.equivalent(Some(from_body), Some(to_body))).then(|| {
                    ReplaceLoopBody {
                        from_stmt,
                        to_stmt,
                        from_body,
                        to_body,
                    }
                    .into()
                })
            })
            .collect())
    }
}
