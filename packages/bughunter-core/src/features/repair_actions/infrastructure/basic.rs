//! Fundamental detectors: deleted, inserted and modified statements

use super::{DetectionContext, RepairActionDetector};
use crate::errors::Result;
use crate::features::repair_actions::domain::repair_action::{
    DeleteStatement, InsertStatement, ModifyStatement,
};
use crate::features::repair_actions::domain::{ActionKind, ActionSet, RepairAction};
use crate::shared::models::{EditOp, NodeId, NodeKind};
use crate::shared::utils::statement_locator::{
    nearest_enclosing_statement, nearest_mapped_statement,
};
use std::collections::BTreeMap;
use tracing::trace;

/// Before-statements without an after-correspondent
///
/// Only the outermost statement of a deleted subtree is reported. The
/// deleted children of an unmapped block whose content partly survived are
/// anchored at the block's parent instead (one level only); the block itself
/// is reported like any other statement.
pub struct DeleteStatementDetector;

impl RepairActionDetector for DeleteStatementDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::DeleteStatement
    }

    fn detect(&self, ctx: &DetectionContext<'_>, _actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let correspondence = ctx.correspondence();

        Ok(ctx
            .before_statements()
            .iter()
            .copied()
            .filter(|stmt| !correspondence.is_mapped_before(*stmt))
            .filter(|stmt| {
                deletion_anchor(ctx, *stmt)
                    .map_or(false, |anchor| correspondence.is_mapped_before(anchor))
            })
            .map(|stmt| DeleteStatement { stmt }.into())
            .collect())
    }
}

fn deletion_anchor(ctx: &DetectionContext<'_>, stmt: NodeId) -> Option<NodeId> {
    let parent = ctx.before().parent(stmt)?;
    if is_block_noise(ctx, parent) {
        trace!(%stmt, block = %parent, "looking through unmapped block");
        ctx.before().parent(parent)
    } else {
        Some(parent)
    }
}

fn is_block_noise(ctx: &DetectionContext<'_>, id: NodeId) -> bool {
    let before = ctx.before();
    let correspondence = ctx.correspondence();

    before.kind(id) == NodeKind::Block
        && !correspondence.is_mapped_before(id)
        && before
            .parent(id)
            .map_or(false, |p| correspondence.is_mapped_before(p))
        && before
            .children(id)
            .iter()
            .any(|child| correspondence.is_mapped_before(*child))
}

/// After-statements without a before-correspondent, outermost only
pub struct InsertStatementDetector;

impl RepairActionDetector for InsertStatementDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::InsertStatement
    }

    fn detect(&self, ctx: &DetectionContext<'_>, _actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let correspondence = ctx.correspondence();

        Ok(ctx
            .after_statements()
            .iter()
            .copied()
            .filter(|stmt| !correspondence.is_mapped_after(*stmt))
            .filter_map(|stmt| {
                let parent = ctx.after().parent(stmt)?;
                correspondence
                    .is_mapped_after(parent)
                    .then(|| InsertStatement { stmt, parent }.into())
            })
            .collect())
    }
}

/// Edits grouped by the surviving statement they touch
///
/// Inserted and deleted nodes are attributed to their nearest mapped
/// statement, updated nodes to their nearest statement. A moved node is
/// attributed to the statements around its old and its new position; the
/// moved node itself counts as relocated, not modified.
pub struct ModifyStatementDetector;

impl RepairActionDetector for ModifyStatementDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ModifyStatement
    }

    fn detect(&self, ctx: &DetectionContext<'_>, _actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let mut groups: BTreeMap<NodeId, Vec<EditOp>> = BTreeMap::new();

        for edit in ctx.edits() {
            for stmt in subject_statements(ctx, edit) {
                let group = groups.entry(stmt).or_default();
                if !group.contains(edit) {
                    group.push(*edit);
                }
            }
        }

        Ok(groups
            .into_iter()
            .filter_map(|(from, edits)| {
                // statements without a counterpart were deleted
                let to = ctx.after_of(from)?;
                Some(ModifyStatement { from, to, edits }.into())
            })
            .collect())
    }
}

/// Before-tree statements an edit is attributed to
fn subject_statements(ctx: &DetectionContext<'_>, edit: &EditOp) -> Vec<NodeId> {
    let before = ctx.before();
    let after = ctx.after();
    let correspondence = ctx.correspondence();
    let mapped_before = |id: NodeId| correspondence.is_mapped_before(id);
    let mapped_after = |id: NodeId| correspondence.is_mapped_after(id);

    let mut stmts = Vec::with_capacity(2);
    match *edit {
        EditOp::Insert { inserted } => {
            stmts.extend(
                nearest_mapped_statement(after, inserted, mapped_after)
                    .and_then(|s| ctx.before_of(s)),
            );
        }
        EditOp::Delete { deleted } => {
            stmts.extend(nearest_mapped_statement(before, deleted, mapped_before));
        }
        EditOp::Update { before: node, .. } => {
            stmts.extend(nearest_enclosing_statement(before, node));
        }
        EditOp::Move {
            moved_from,
            moved_to,
        } => {
            stmts.extend(
                before
                    .parent(moved_from)
                    .and_then(|p| nearest_mapped_statement(before, p, mapped_before)),
            );
            let destination = after
                .parent(moved_to)
                .and_then(|p| nearest_mapped_statement(after, p, mapped_after))
                .and_then(|s| ctx.before_of(s));
            if let Some(stmt) = destination {
                if !stmts.contains(&stmt) {
                    stmts.push(stmt);
                }
            }
        }
    }
    stmts
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::shared::models::Diff;
    use pretty_assertions::assert_eq;

    const FUNDAMENTAL: [&dyn RepairActionDetector; 3] = [
        &DeleteStatementDetector,
        &InsertStatementDetector,
        &ModifyStatementDetector,
    ];

    // if (x) { f(); }  →  if (x) { f(); g(); }
    fn appended_call() -> Diff {
        diff_with_paths(
            unit(vec![if_then(
                ident("x"),
                block(vec![expr_stmt(call("f", vec![]))]),
            )]),
            unit(vec![if_then(
                ident("x"),
                block(vec![expr_stmt(call("f", vec![])), expr_stmt(call("g", vec![]))]),
            )]),
            &[
                ("/", "/"),
                ("0", "0"),
                ("0/0", "0/0"),
                ("0/1", "0/1"),
                ("0/1/0", "0/1/0"),
                ("0/1/0/0", "0/1/0/0"),
                ("0/1/0/0/0", "0/1/0/0/0"),
                ("0/1/0/0/1", "0/1/0/0/1"),
            ],
            |_, after| {
                let stmt = after.at("0/1/1").unwrap();
                after
                    .subtree(stmt)
                    .map(|inserted| EditOp::Insert { inserted })
                    .collect()
            },
        )
    }

    #[test]
    fn test_inserted_statement_is_outermost_only() {
        let diff = appended_call();
        let actions = run(&diff, &FUNDAMENTAL);
        let after = diff.after();

        let inserts: Vec<_> = actions.insert_statements().cloned().collect();
        assert_eq!(
            inserts,
            vec![InsertStatement {
                stmt: after.at("0/1/1").unwrap(),
                parent: after.at("0/1").unwrap(),
            }]
        );
        assert_eq!(actions.delete_statements().count(), 0);
    }

    #[test]
    fn test_inserts_are_attributed_to_enclosing_block() {
        let diff = appended_call();
        let actions = run(&diff, &FUNDAMENTAL);

        let modified: Vec<_> = actions.modify_statements().collect();
        assert_eq!(modified.len(), 1);
        assert_eq!(modified[0].from, diff.before().at("0/1").unwrap());
        assert_eq!(modified[0].to, diff.after().at("0/1").unwrap());
        assert_eq!(modified[0].edits.len(), 4);
    }

    #[test]
    fn test_deleted_subtree_reports_outermost_statement() {
        // { a(); if (x) { b(); } }  →  { a(); }
        let diff = diff_with_paths(
            unit(vec![block(vec![
                expr_stmt(call("a", vec![])),
                if_then(ident("x"), block(vec![expr_stmt(call("b", vec![]))])),
            ])]),
            unit(vec![block(vec![expr_stmt(call("a", vec![]))])]),
            &[
                ("/", "/"),
                ("0", "0"),
                ("0/0", "0/0"),
                ("0/0/0", "0/0/0"),
                ("0/0/0/0", "0/0/0/0"),
                ("0/0/0/1", "0/0/0/1"),
            ],
            |before, _| {
                let stmt = before.at("0/1").unwrap();
                before
                    .subtree(stmt)
                    .map(|deleted| EditOp::Delete { deleted })
                    .collect()
            },
        );
        let actions = run(&diff, &FUNDAMENTAL);

        let deletes: Vec<_> = actions.delete_statements().map(|d| d.stmt).collect();
        assert_eq!(deletes, vec![diff.before().at("0/1").unwrap()]);

        let modified: Vec<_> = actions.modify_statements().map(|m| m.from).collect();
        assert_eq!(modified, vec![diff.before().at("0").unwrap()]);
    }

    #[test]
    fn test_unmapped_wrapper_block_is_reported_and_looked_through() {
        // if (x) { a(); b(); }  →  if (x) a();
        let diff = diff_with_paths(
            unit(vec![if_then(
                ident("x"),
                block(vec![expr_stmt(call("a", vec![])), expr_stmt(call("b", vec![]))]),
            )]),
            unit(vec![if_then(ident("x"), expr_stmt(call("a", vec![])))]),
            &[
                ("/", "/"),
                ("0", "0"),
                ("0/0", "0/0"),
                ("0/1/0", "0/1"),
                ("0/1/0/0", "0/1/0"),
                ("0/1/0/0/0", "0/1/0/0"),
                ("0/1/0/0/1", "0/1/0/1"),
            ],
            |_, _| vec![],
        );
        let actions = run(&diff, &FUNDAMENTAL);

        let deletes: Vec<_> = actions.delete_statements().map(|d| d.stmt).collect();
        assert_eq!(
            deletes,
            vec![
                diff.before().at("0/1").unwrap(),
                diff.before().at("0/1/1").unwrap(),
            ]
        );
    }

    #[test]
    fn test_update_is_attributed_to_nearest_statement() {
        // x = 1;  →  x = 2;
        let stmt = |v| unit(vec![expr_stmt(assign(ident("x"), "=", constant(v)))]);
        let paths = ["/", "0", "0/0", "0/0/0", "0/0/1", "0/0/2"];
        let pairs: Vec<(&str, &str)> = paths.iter().map(|p| (*p, *p)).collect();
        let diff = diff_with_paths(stmt("1"), stmt("2"), &pairs, |before, after| {
            vec![EditOp::Update {
                before: before.at("0/0/2").unwrap(),
                after: after.at("0/0/2").unwrap(),
            }]
        });
        let actions = run(&diff, &FUNDAMENTAL);

        let modified: Vec<_> = actions.modify_statements().cloned().collect();
        assert_eq!(modified.len(), 1);
        assert_eq!(modified[0].from, diff.before().at("0").unwrap());
        assert_eq!(modified[0].edits.len(), 1);
        assert_eq!(actions.insert_statements().count(), 0);
        assert_eq!(actions.delete_statements().count(), 0);
    }

    #[test]
    fn test_move_attributes_to_surrounding_statements() {
        // { a(); { b(); } }  →  { { b(); a(); } }
        let diff = diff_with_paths(
            unit(vec![block(vec![
                expr_stmt(call("a", vec![])),
                block(vec![expr_stmt(call("b", vec![]))]),
            ])]),
            unit(vec![block(vec![block(vec![
                expr_stmt(call("b", vec![])),
                expr_stmt(call("a", vec![])),
            ])])]),
            &[
                ("/", "/"),
                ("0", "0"),
                ("0/0", "0/0/1"),
                ("0/0/0", "0/0/1/0"),
                ("0/0/0/0", "0/0/1/0/0"),
                ("0/0/0/1", "0/0/1/0/1"),
                ("0/1", "0/0"),
                ("0/1/0", "0/0/0"),
                ("0/1/0/0", "0/0/0/0"),
                ("0/1/0/0/0", "0/0/0/0/0"),
                ("0/1/0/0/1", "0/0/0/0/1"),
            ],
            |before, after| {
                vec![EditOp::Move {
                    moved_from: before.at("0/0").unwrap(),
                    moved_to: after.at("0/0/1").unwrap(),
                }]
            },
        );
        let actions = run(&diff, &FUNDAMENTAL);

        let mut modified: Vec<_> = actions.modify_statements().map(|m| m.from).collect();
        modified.sort();
        let before = diff.before();
        assert_eq!(modified, vec![before.at("0").unwrap(), before.at("0/1").unwrap()]);
    }
}
