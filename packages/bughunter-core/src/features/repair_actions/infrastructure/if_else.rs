//! If-statement detectors: guards, then-branches and else-branches

use super::{modified_pairs, DetectionContext, RepairActionDetector};
use crate::errors::Result;
use crate::features::repair_actions::domain::repair_action::{
    DeleteStatement, GuardElseBranch, InsertElseBranch, InsertElseIfBranch, InsertStatement,
    ModifyStatement, RemoveElseBranch, ReplaceElseBranch, ReplaceIfCondition, ReplaceThenBranch,
    UnwrapStatement, WrapStatement,
};
use crate::features::repair_actions::domain::{ActionKind, ActionSet, RepairAction};
use crate::shared::models::{NodeId, NodeKind, Role};
use rustc_hash::FxHashSet;

/// An inserted else-less if whose then-branch is an existing, unmodified
/// statement: the statement was wrapped in a new guard
pub struct WrapStatementDetector;

impl RepairActionDetector for WrapStatementDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::WrapStatement
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let after = ctx.after();
        let modified: FxHashSet<NodeId> = actions
            .require_of::<ModifyStatement>(self.kind())?
            .into_iter()
            .map(|m| m.to)
            .collect();

        let mut found = Vec::new();
        for inserted in actions.require_of::<InsertStatement>(self.kind())? {
            let wrapper = inserted.stmt;
            if after.kind(wrapper) != NodeKind::IfElse || after.else_branch(wrapper).is_some() {
                continue;
            }
            let (Some(then), Some(guard)) = (after.then_branch(wrapper), after.condition(wrapper))
            else {
                continue;
            };
            let then = after.unwrap_singleton_block(then);
            let Some(stmt) = ctx.before_of(then) else {
                continue;
            };
            if after.is_statement(then) && !modified.contains(&then) {
                found.push(
                    WrapStatement {
                        stmt,
                        wrapper,
                        guard,
                    }
                    .into(),
                );
            }
        }
        Ok(found)
    }
}

/// A deleted else-less if whose then-branch survives: the guard was removed
pub struct UnwrapStatementDetector;

impl RepairActionDetector for UnwrapStatementDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::UnwrapStatement
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let before = ctx.before();

        Ok(actions
            .require_of::<DeleteStatement>(self.kind())?
            .into_iter()
            .map(|d| d.stmt)
            .filter(|stmt| {
                before.kind(*stmt) == NodeKind::IfElse && before.else_branch(*stmt).is_none()
            })
            .filter_map(|stmt| {
                let then = before.unwrap_singleton_block(before.then_branch(stmt)?);
                let to = ctx.after_of(then)?;
                Some(UnwrapStatement { stmt, to }.into())
            })
            .collect())
    }
}

/// Modified if-statements whose guard is not equivalent
pub struct ReplaceIfConditionDetector;

impl RepairActionDetector for ReplaceIfConditionDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceIfCondition
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(modified_pairs(actions, self.kind())?
            .into_iter()
            .filter(|(b, a)| {
                before.kind(*b) == NodeKind::IfElse && after.kind(*a) == NodeKind::IfElse
            })
            .filter_map(|(from_stmt, to_stmt)| {
                let from_guard = before.condition(from_stmt)?;
                let to_guard = after.condition(to_stmt)?;
                (!ctx.equivalent(Some(from_guard), Some(to_guard))).then(|| {
                    ReplaceIfCondition {
                        from_stmt,
                        to_stmt,
                        from_guard,
                        to_guard,
                    }
                    .into()
                })
            })
            .collect())
    }
}

/// `(before, after)` pairs of if-statements that survived the fix
fn surviving_ifs(ctx: &DetectionContext<'_>) -> Vec<(NodeId, NodeId)> {
    ctx.after_statements()
        .iter()
        .copied()
        .filter(|a| ctx.after().kind(*a) == NodeKind::IfElse)
        .filter_map(|a| ctx.before_of(a).map(|b| (b, a)))
        .filter(|(b, _)| ctx.before().kind(*b) == NodeKind::IfElse)
        .collect()
}

pub struct ReplaceThenBranchDetector;

impl RepairActionDetector for ReplaceThenBranchDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceThenBranch
    }

    fn detect(&self, ctx: &DetectionContext<'_>, _actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(surviving_ifs(ctx)
            .into_iter()
            .filter_map(|(from_stmt, to_stmt)| {
                let from_then = ctx.before().then_branch(from_stmt)?;
                let to_then = ctx.after().then_branch(to_stmt)?;
                (!ctx.equivalent(Some(from_then), Some(to_then))).then(|| {
                    ReplaceThenBranch {
                        from_stmt,
                        to_stmt,
                        from_then,
                        to_then,
                    }
                    .into()
                })
            })
            .collect())
    }
}

/// The else-branch existed on both sides and changed
pub struct ReplaceElseBranchDetector;

impl RepairActionDetector for ReplaceElseBranchDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceElseBranch
    }

    fn detect(&self, ctx: &DetectionContext<'_>, _actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(surviving_ifs(ctx)
            .into_iter()
            .filter_map(|(from_stmt, to_stmt)| {
                let from_else = ctx.before().else_branch(from_stmt)?;
                let to_else = ctx.after().else_branch(to_stmt)?;
                (!ctx.equivalent(Some(from_else), Some(to_else))).then(|| {
                    ReplaceElseBranch {
                        from_stmt,
                        to_stmt,
                        from_else,
                        to_else,
                    }
                    .into()
                })
            })
            .collect())
    }
}

pub struct RemoveElseBranchDetector;

impl RepairActionDetector for RemoveElseBranchDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::RemoveElseBranch
    }

    fn detect(&self, ctx: &DetectionContext<'_>, _actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(surviving_ifs(ctx)
            .into_iter()
            .filter(|(_, to_stmt)| ctx.after().else_branch(*to_stmt).is_none())
            .filter_map(|(from_stmt, to_stmt)| {
                let from_else = ctx.before().else_branch(from_stmt)?;
                Some(
                    RemoveElseBranch {
                        from_stmt,
                        to_stmt,
                        from_else,
                    }
                    .into(),
                )
            })
            .collect())
    }
}

/// Modified if-statements that gained an else-branch: `(from, to, else)`
fn gained_else(
    ctx: &DetectionContext<'_>,
    actions: &ActionSet,
    detector: ActionKind,
) -> Result<Vec<(NodeId, NodeId, NodeId)>> {
    let (before, after) = (ctx.before(), ctx.after());

    Ok(modified_pairs(actions, detector)?
        .into_iter()
        .filter(|(b, a)| before.kind(*b) == NodeKind::IfElse && after.kind(*a) == NodeKind::IfElse)
        .filter(|(b, _)| before.else_branch(*b).is_none())
        .filter_map(|(b, a)| after.else_branch(a).map(|els| (b, a, els)))
        .collect())
}

/// A plain else-branch was added
pub struct InsertElseBranchDetector;

impl RepairActionDetector for InsertElseBranchDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::InsertElseBranch
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(gained_else(ctx, actions, self.kind())?
            .into_iter()
            .filter(|(_, _, els)| ctx.after().kind(*els) != NodeKind::IfElse)
            .map(|(from_stmt, to_stmt, els)| {
                InsertElseBranch {
                    from_stmt,
                    to_stmt,
                    els,
                }
                .into()
            })
            .collect())
    }
}

/// An else-if branch was added to a chain
pub struct InsertElseIfBranchDetector;

impl RepairActionDetector for InsertElseIfBranchDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::InsertElseIfBranch
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(gained_else(ctx, actions, self.kind())?
            .into_iter()
            .filter(|(_, _, els)| ctx.after().kind(*els) == NodeKind::IfElse)
            .map(|(from_stmt, to_stmt, else_if)| {
                InsertElseIfBranch {
                    from_stmt,
                    to_stmt,
                    else_if,
                }
                .into()
            })
            .collect())
    }
}

/// The old else-body was moved under a new guard inside the else-branch
///
/// `if (a) X; else Y;` becoming `if (a) X; else if (b) Y;`
pub struct GuardElseBranchDetector;

impl RepairActionDetector for GuardElseBranchDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::GuardElseBranch
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        let mut found = Vec::new();
        for inserted in actions.require_of::<InsertStatement>(self.kind())? {
            let to_if = inserted.stmt;
            if after.kind(to_if) != NodeKind::IfElse || after.else_branch(to_if).is_some() {
                continue;
            }
            let (Some(guard), Some(then)) = (after.condition(to_if), after.then_branch(to_if))
            else {
                continue;
            };
            let Some(outer) = enclosing_if_of_else(ctx, to_if) else {
                continue;
            };
            let Some(from_if) = ctx.before_of(outer) else {
                continue;
            };
            if before.kind(from_if) != NodeKind::IfElse {
                continue;
            }
            let Some(old_else) = before.else_branch(from_if) else {
                continue;
            };

            let targets = [old_else, before.unwrap_singleton_block(old_else)];
            let promoted = [then, after.unwrap_singleton_block(then)]
                .into_iter()
                .filter_map(|n| ctx.before_of(n))
                .any(|b| targets.contains(&b));

            if promoted {
                found.push(
                    GuardElseBranch {
                        from_if,
                        to_if,
                        guard,
                    }
                    .into(),
                );
            }
        }
        Ok(found)
    }
}

/// After-tree if-statement whose else-branch holds `node`, looking through
/// one else-block
fn enclosing_if_of_else(ctx: &DetectionContext<'_>, node: NodeId) -> Option<NodeId> {
    let after = ctx.after();
    let mut parent = after.parent(node)?;
    if after.kind(parent) == NodeKind::Block && after.role(parent) == Some(Role::Else) {
        parent = after.parent(parent)?;
    }
    let els = after.else_branch(parent)?;
    (after.kind(parent) == NodeKind::IfElse && after.is_ancestor_or_self(els, node))
        .then_some(parent)
}
