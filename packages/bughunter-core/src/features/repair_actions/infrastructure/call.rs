//! Function call detectors
//!
//! `ModifyCall` collects changed calls inside modified statements. A changed
//! call is then split by whether its target or its argument list changed,
//! and argument-list changes are classified further when exactly one slot
//! was inserted, removed or replaced. Anything wider, or any change with
//! more than one consistent explanation, stays a plain `ModifyCallArgs`.

use super::{modified_expressions, DetectionContext, RepairActionDetector};
use crate::errors::Result;
use crate::features::repair_actions::domain::repair_action::{
    InsertCallArg, ModifyCall, ModifyCallArgs, RemoveCallArg, ReplaceCallArg, ReplaceCallTarget,
};
use crate::features::repair_actions::domain::{ActionKind, ActionSet, RepairAction};
use crate::shared::models::{NodeId, NodeKind};
use tracing::debug;

pub struct ModifyCallDetector;

impl RepairActionDetector for ModifyCallDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ModifyCall
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(
            modified_expressions(ctx, actions, self.kind(), NodeKind::FunctionCall)?
                .into_iter()
                .map(|(from, to)| ModifyCall { from, to }.into())
                .collect(),
        )
    }
}

/// Different callee, same arguments
pub struct ReplaceCallTargetDetector;

impl RepairActionDetector for ReplaceCallTargetDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceCallTarget
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(actions
            .require_of::<ModifyCall>(self.kind())?
            .into_iter()
            .filter(|m| {
                ctx.equivalent_lists(before.call_arguments(m.from), after.call_arguments(m.to))
            })
            .filter_map(|m| {
                let from = before.call_target(m.from)?;
                let to = after.call_target(m.to)?;
                (!ctx.equivalent(Some(from), Some(to)))
                    .then(|| ReplaceCallTarget { from, to }.into())
            })
            .collect())
    }
}

/// Same callee, different arguments
pub struct ModifyCallArgsDetector;

impl RepairActionDetector for ModifyCallArgsDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ModifyCallArgs
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(actions
            .require_of::<ModifyCall>(self.kind())?
            .into_iter()
            .filter(|m| ctx.equivalent(before.call_target(m.from), after.call_target(m.to)))
            .filter(|m| {
                !ctx.equivalent_lists(before.call_arguments(m.from), after.call_arguments(m.to))
            })
            .map(|m| {
                ModifyCallArgs {
                    from_call: m.from,
                    to_call: m.to,
                }
                .into()
            })
            .collect())
    }
}

/// Positions `i` of the longer list such that dropping element `i` leaves
/// a list element-wise equivalent to the shorter one
///
/// `same(i, j)` compares element `i` of the longer list with element `j` of
/// the shorter list.
fn single_extra_positions<F>(longer: usize, shorter: usize, same: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> bool,
{
    if longer != shorter + 1 {
        return Vec::new();
    }
    (0..longer)
        .filter(|&skip| {
            (0..shorter).all(|j| {
                let i = if j < skip { j } else { j + 1 };
                same(i, j)
            })
        })
        .collect()
}

/// The only consistent position, if there is exactly one
fn unambiguous(positions: Vec<usize>, call: NodeId, what: &str) -> Option<usize> {
    match positions.as_slice() {
        [only] => Some(*only),
        [] => None,
        _ => {
            debug!(%call, candidates = positions.len(), "ambiguous argument {}", what);
            None
        }
    }
}

/// Exactly one argument was inserted, order preserved
pub struct InsertCallArgDetector;

impl RepairActionDetector for InsertCallArgDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::InsertCallArg
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(actions
            .require_of::<ModifyCallArgs>(self.kind())?
            .into_iter()
            .filter_map(|m| {
                let from = before.call_arguments(m.from_call);
                let to = after.call_arguments(m.to_call);
                let positions = single_extra_positions(to.len(), from.len(), |i, j| {
                    ctx.equivalent(Some(from[j]), Some(to[i]))
                });
                let slot = unambiguous(positions, m.to_call, "insertion")?;
                Some(
                    InsertCallArg {
                        call: m.to_call,
                        arg: to[slot],
                    }
                    .into(),
                )
            })
            .collect())
    }
}

/// Exactly one argument was removed, order preserved
pub struct RemoveCallArgDetector;

impl RepairActionDetector for RemoveCallArgDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::RemoveCallArg
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(actions
            .require_of::<ModifyCallArgs>(self.kind())?
            .into_iter()
            .filter_map(|m| {
                let from = before.call_arguments(m.from_call);
                let to = after.call_arguments(m.to_call);
                let positions = single_extra_positions(from.len(), to.len(), |i, j| {
                    ctx.equivalent(Some(from[i]), Some(to[j]))
                });
                let slot = unambiguous(positions, m.from_call, "removal")?;
                Some(
                    RemoveCallArg {
                        call: m.from_call,
                        arg: from[slot],
                    }
                    .into(),
                )
            })
            .collect())
    }
}

/// Same arity, exactly one differing slot
pub struct ReplaceCallArgDetector;

impl RepairActionDetector for ReplaceCallArgDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceCallArg
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(actions
            .require_of::<ModifyCallArgs>(self.kind())?
            .into_iter()
            .filter_map(|m| {
                let from = before.call_arguments(m.from_call);
                let to = after.call_arguments(m.to_call);
                if from.len() != to.len() {
                    return None;
                }
                let mut differing = from
                    .iter()
                    .zip(to)
                    .filter(|(b, a)| !ctx.equivalent(Some(**b), Some(**a)));
                match (differing.next(), differing.next()) {
                    (Some((from, to)), None) => Some(
                        ReplaceCallArg {
                            from: *from,
                            to: *to,
                        }
                        .into(),
                    ),
                    _ => None,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::basic::ModifyStatementDetector;
    use super::super::test_support::*;
    use super::*;
    use crate::shared::models::{Ast, Diff, EditOp, TreeNode};
    use pretty_assertions::assert_eq;

    const CALLS: [&dyn RepairActionDetector; 7] = [
        &ModifyStatementDetector,
        &ModifyCallDetector,
        &ReplaceCallTargetDetector,
        &ModifyCallArgsDetector,
        &InsertCallArgDetector,
        &RemoveCallArgDetector,
        &ReplaceCallArgDetector,
    ];

    fn stmt(target: &str, args: &[&str]) -> TreeNode {
        unit(vec![expr_stmt(call(
            target,
            args.iter().map(|a| ident(a)).collect(),
        ))])
    }

    /// Call statement rewritten in place; argument nodes are mapped by
    /// position up to the shorter list and the rest inserted or deleted
    fn rewrite(from: (&str, &[&str]), to: (&str, &[&str])) -> Diff {
        let shared = from.1.len().min(to.1.len());
        let mut pairs: Vec<(String, String)> = ["/", "0", "0/0", "0/0/0", "0/0/1"]
            .iter()
            .map(|p| (p.to_string(), p.to_string()))
            .collect();
        pairs.extend((0..shared).map(|i| (format!("0/0/1/{}", i), format!("0/0/1/{}", i))));
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(b, a)| (b.as_str(), a.as_str())).collect();

        let (from_len, to_len) = (from.1.len(), to.1.len());
        let target_changed = from.0 != to.0;
        let updated: Vec<usize> = (0..shared).filter(|i| from.1[*i] != to.1[*i]).collect();

        diff_with_paths(stmt(from.0, from.1), stmt(to.0, to.1), &pairs, |b: &Ast, a: &Ast| {
            let at = |ast: &Ast, path: String| ast.at(&path).unwrap();
            let mut edits = Vec::new();
            if target_changed {
                edits.push(EditOp::Update {
                    before: at(b, "0/0/0".into()),
                    after: at(a, "0/0/0".into()),
                });
            }
            for i in &updated {
                edits.push(EditOp::Update {
                    before: at(b, format!("0/0/1/{}", i)),
                    after: at(a, format!("0/0/1/{}", i)),
                });
            }
            for i in shared..to_len {
                edits.push(EditOp::Insert {
                    inserted: at(a, format!("0/0/1/{}", i)),
                });
            }
            for i in shared..from_len {
                edits.push(EditOp::Delete {
                    deleted: at(b, format!("0/0/1/{}", i)),
                });
            }
            edits
        })
    }

    fn mine(diff: &Diff) -> ActionSet {
        run(diff, &CALLS)
    }

    #[test]
    fn test_appended_argument() {
        let diff = rewrite(("foo", &["a", "b"]), ("foo", &["a", "b", "c"]));
        let actions = mine(&diff);

        let inserted: Vec<_> = actions.insert_call_args().cloned().collect();
        assert_eq!(
            inserted,
            vec![InsertCallArg {
                call: diff.after().at("0/0").unwrap(),
                arg: diff.after().at("0/0/1/2").unwrap(),
            }]
        );
        assert_eq!(actions.modify_call_args().count(), 1);
        assert_eq!(actions.replace_call_targets().count(), 0);
        assert_eq!(actions.remove_call_args().count(), 0);
        assert_eq!(actions.replace_call_args().count(), 0);
    }

    #[test]
    fn test_removed_argument() {
        let diff = rewrite(("foo", &["a", "b"]), ("foo", &["a"]));
        let actions = mine(&diff);

        let removed: Vec<_> = actions.remove_call_args().map(|r| r.arg).collect();
        assert_eq!(removed, vec![diff.before().at("0/0/1/1").unwrap()]);
    }

    #[test]
    fn test_ambiguous_insertion_is_excluded() {
        // foo(a) → foo(a, a): either slot could be the new one
        let diff = rewrite(("foo", &["a"]), ("foo", &["a", "a"]));
        let actions = mine(&diff);

        assert_eq!(actions.modify_call_args().count(), 1);
        assert_eq!(actions.insert_call_args().count(), 0);
    }

    #[test]
    fn test_replaced_single_argument() {
        let diff = rewrite(("foo", &["a", "b"]), ("foo", &["a", "c"]));
        let actions = mine(&diff);

        let replaced: Vec<_> = actions.replace_call_args().cloned().collect();
        assert_eq!(
            replaced,
            vec![ReplaceCallArg {
                from: diff.before().at("0/0/1/1").unwrap(),
                to: diff.after().at("0/0/1/1").unwrap(),
            }]
        );
    }

    #[test]
    fn test_two_replaced_arguments_stay_coarse() {
        let diff = rewrite(("foo", &["a", "b"]), ("foo", &["c", "d"]));
        let actions = mine(&diff);

        assert_eq!(actions.modify_call_args().count(), 1);
        assert_eq!(actions.replace_call_args().count(), 0);
        assert_eq!(actions.insert_call_args().count(), 0);
        assert_eq!(actions.remove_call_args().count(), 0);
    }

    #[test]
    fn test_replaced_target() {
        let diff = rewrite(("foo", &["a"]), ("bar", &["a"]));
        let actions = mine(&diff);

        let targets: Vec<_> = actions.replace_call_targets().cloned().collect();
        assert_eq!(
            targets,
            vec![ReplaceCallTarget {
                from: diff.before().at("0/0/0").unwrap(),
                to: diff.after().at("0/0/0").unwrap(),
            }]
        );
        assert_eq!(actions.modify_call_args().count(), 0);
    }

    #[test]
    fn test_single_extra_positions() {
        let same = |xs: &[u8], ys: &[u8]| {
            single_extra_positions(xs.len(), ys.len(), |i, j| xs[i] == ys[j])
        };
        assert_eq!(same(&[1, 2, 3], &[1, 2]), vec![2]);
        assert_eq!(same(&[0, 1, 2], &[1, 2]), vec![0]);
        assert_eq!(same(&[1, 1], &[1]), vec![0, 1]);
        assert!(same(&[1, 2], &[1, 2]).is_empty());
        assert!(same(&[3, 4, 5], &[1, 2]).is_empty());
    }
}
