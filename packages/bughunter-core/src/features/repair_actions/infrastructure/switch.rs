use super::{modified_pairs, DetectionContext, RepairActionDetector};
use crate::errors::Result;
use crate::features::repair_actions::domain::repair_action::ReplaceSwitchExpression;
use crate::features::repair_actions::domain::{ActionKind, ActionSet, RepairAction};
use crate::shared::models::NodeKind;

/// Modified switch statements whose controlling expression changed
pub struct ReplaceSwitchExpressionDetector;

impl RepairActionDetector for ReplaceSwitchExpressionDetector {
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceSwitchExpression
    }

    fn detect(&self, ctx: &DetectionContext<'_>, actions: &ActionSet) -> Result<Vec<RepairAction>> {
        let (before, after) = (ctx.before(), ctx.after());

        Ok(modified_pairs(actions, self.kind())?
            .into_iter()
            .filter(|(b, a)| {
                before.kind(*b) == NodeKind::Switch && after.kind(*a) == NodeKind::Switch
            })
            .filter_map(|(from_stmt, to_stmt)| {
                let from_expr = before.switch_expr(from_stmt)?;
                let to_expr = after.switch_expr(to_stmt)?;
                (!ctx.equivalent(Some(from_expr), Some(to_expr))).then(|| {
                    ReplaceSwitchExpression {
                        from_stmt,
                        to_stmt,
                        from_expr,
                        to_expr,
                    }
                    .into()
                })
            })
            .collect())
    }
}
