//! Assignment detectors
//!
//! `ModifyAssignment` collects changed assignments inside modified
//! statements; the three part detectors split them by which single part
//! (`lhs`, `op`, `rhs`) changed. An assignment with more than one changed
//! part is ambiguous and belongs to none of them.

use super::{modified_expressions, DetectionContext, RepairActionDetector};
use crate::errors::Result;
use crate::features::repair_actions::domain::repair_action::{
    ModifyAssignment, ReplaceAssignmentLhs, ReplaceAssignmentOp, ReplaceAssignmentRhs,
};
use crate::features::repair_actions::domain::{ActionKind, ActionSet, RepairAction};
use crate::shared::models::{NodeId, NodeKind, Role};

const PARTS: [Role; 3] = [Role::Lhs, Role::Op, Role::Rhs];

pub struct ModifyAssignmentDetector;

impl RepairActionDetector for ModifyAssignmentDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ModifyAssignment
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(
            modified_expressions(ctx, actions, self.kind(), NodeKind::Assignment)?
                .into_iter()
                .map(|(from, to)| ModifyAssignment { from, to }.into())
                .collect(),
        )
    }
}

/// `(before part, after part)` of every modified assignment where `role`
/// is the only changed part
fn single_part_changes(
    ctx: &DetectionContext<'_>,
    actions: &ActionSet,
    detector: ActionKind,
    role: Role,
) -> Result<Vec<(NodeId, NodeId)>> {
    let (before, after) = (ctx.before(), ctx.after());

    Ok(actions
        .require_of::<ModifyAssignment>(detector)?
        .into_iter()
        .filter_map(|m| {
            let changed: Vec<Role> = PARTS
                .into_iter()
                .filter(|part| {
                    !ctx.equivalent(
                        before.child_with_role(m.from, *part),
                        after.child_with_role(m.to, *part),
                    )
                })
                .collect();
            if changed != [role] {
                return None;
            }
            Some((
                before.child_with_role(m.from, role)?,
                after.child_with_role(m.to, role)?,
            ))
        })
        .collect())
}

pub struct ReplaceAssignmentRhsDetector;

impl RepairActionDetector for ReplaceAssignmentRhsDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceAssignmentRhs
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(single_part_changes(ctx, actions, self.kind(), Role::Rhs)?
            .into_iter()
            .map(|(from, to)| ReplaceAssignmentRhs { from, to }.into())
            .collect())
    }
}

pub struct ReplaceAssignmentLhsDetector;

impl RepairActionDetector for ReplaceAssignmentLhsDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceAssignmentLhs
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(single_part_changes(ctx, actions, self.kind(), Role::Lhs)?
            .into_iter()
            .map(|(from, to)| ReplaceAssignmentLhs { from, to }.into())
            .collect())
    }
}

pub struct ReplaceAssignmentOpDetector;

impl RepairActionDetector for ReplaceAssignmentOpDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceAssignmentOp
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        Ok(single_part_changes(ctx, actions, self.kind(), Role::Op)?
            .into_iter()
            .map(|(from, to)| ReplaceAssignmentOp { from, to }.into())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::basic::ModifyStatementDetector;
    use super::super::test_support::*;
    use super::*;
    use crate::shared::models::{Diff, EditOp};

    const ASSIGNMENTS: [&dyn RepairActionDetector; 5] = [
        &ModifyStatementDetector,
        &ModifyAssignmentDetector,
        &ReplaceAssignmentRhsDetector,
        &ReplaceAssignmentLhsDetector,
        &ReplaceAssignmentOpDetector,
    ];

    const PATHS: [&str; 6] = ["/", "0", "0/0", "0/0/0", "0/0/1", "0/0/2"];

    /// `lhs op rhs;` rewritten in place, every changed leaf updated
    fn rewrite(from: (&str, &str, &str), to: (&str, &str, &str)) -> Diff {
        let program = |(l, o, r): (&str, &str, &str)| {
            unit(vec![expr_stmt(assign(ident(l), o, constant(r)))])
        };
        let pairs: Vec<_> = PATHS.iter().map(|p| (*p, *p)).collect();
        let changed: Vec<&str> = [
            (from.0 != to.0, "0/0/0"),
            (from.1 != to.1, "0/0/1"),
            (from.2 != to.2, "0/0/2"),
        ]
        .into_iter()
        .filter(|(changed, _)| *changed)
        .map(|(_, path)| path)
        .collect();

        diff_with_paths(program(from), program(to), &pairs, |before, after| {
            changed
                .iter()
                .map(|path| EditOp::Update {
                    before: before.at(path).unwrap(),
                    after: after.at(path).unwrap(),
                })
                .collect()
        })
    }

    #[test]
    fn test_replaced_rhs() {
        let diff = rewrite(("x", "=", "1"), ("x", "=", "2"));
        let actions = run(&diff, &ASSIGNMENTS);

        assert_eq!(actions.modify_assignments().count(), 1);
        let rhs: Vec<_> = actions.replace_assignment_rhs().collect();
        assert_eq!(rhs.len(), 1);
        assert_eq!(rhs[0].from, diff.before().at("0/0/2").unwrap());
        assert_eq!(rhs[0].to, diff.after().at("0/0/2").unwrap());
        assert_eq!(actions.replace_assignment_lhs().count(), 0);
        assert_eq!(actions.replace_assignment_ops().count(), 0);
    }

    #[test]
    fn test_replaced_lhs() {
        let diff = rewrite(("x", "=", "1"), ("y", "=", "1"));
        let actions = run(&diff, &ASSIGNMENTS);

        let lhs: Vec<_> = actions.replace_assignment_lhs().collect();
        assert_eq!(lhs.len(), 1);
        assert_eq!(lhs[0].from, diff.before().at("0/0/0").unwrap());
        assert_eq!(lhs[0].to, diff.after().at("0/0/0").unwrap());
        assert_eq!(actions.replace_assignment_rhs().count(), 0);
        assert_eq!(actions.replace_assignment_ops().count(), 0);
    }

    #[test]
    fn test_replaced_operator() {
        let diff = rewrite(("x", "=", "1"), ("x", "+=", "1"));
        let actions = run(&diff, &ASSIGNMENTS);

        assert_eq!(actions.replace_assignment_ops().count(), 1);
        assert_eq!(actions.replace_assignment_rhs().count(), 0);
    }

    #[test]
    fn test_two_changed_parts_are_excluded() {
        let diff = rewrite(("x", "=", "1"), ("y", "=", "2"));
        let actions = run(&diff, &ASSIGNMENTS);

        assert_eq!(actions.modify_assignments().count(), 1);
        assert_eq!(actions.replace_assignment_rhs().count(), 0);
        assert_eq!(actions.replace_assignment_lhs().count(), 0);
        assert_eq!(actions.replace_assignment_ops().count(), 0);
    }
}
