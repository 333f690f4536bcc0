//! Action set: append-only map from category to detected actions

use super::repair_action::*;
use super::ActionKind;
use crate::errors::{BughunterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Actions of one diff, keyed by category
///
/// A category present in the set is complete: it was either mined in full
/// or loaded verbatim from cache. Categories are never extended or replaced
/// once inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionSet {
    categories: BTreeMap<ActionKind, Vec<RepairAction>>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly mined category
    ///
    /// Fails if the category is already present or if an action of another
    /// category slipped in.
    pub fn insert_category(&mut self, kind: ActionKind, actions: Vec<RepairAction>) -> Result<()> {
        if self.categories.contains_key(&kind) {
            return Err(BughunterError::pipeline(format!(
                "category {} was mined twice",
                kind
            )));
        }
        if let Some(stray) = actions.iter().find(|a| a.kind() != kind) {
            return Err(BughunterError::pipeline(format!(
                "detector for {} produced a {} action",
                kind,
                stray.kind()
            )));
        }
        self.categories.insert(kind, actions);
        Ok(())
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.categories.contains_key(&kind)
    }

    /// Actions of a category, `None` if it was never mined
    pub fn get(&self, kind: ActionKind) -> Option<&[RepairAction]> {
        self.categories.get(&kind).map(Vec::as_slice)
    }

    /// Actions of a category a detector depends on
    pub fn require(&self, kind: ActionKind, detector: ActionKind) -> Result<&[RepairAction]> {
        self.get(kind).ok_or(BughunterError::DependencyMissing {
            detector,
            missing: kind,
        })
    }

    /// Typed view of one category (empty if the category is absent)
    pub fn of<T: ActionVariant>(&self) -> impl Iterator<Item = &T> {
        self.get(T::KIND)
            .unwrap_or_default()
            .iter()
            .filter_map(T::from_action)
    }

    /// Typed view of a prerequisite category
    pub fn require_of<T: ActionVariant>(&self, detector: ActionKind) -> Result<Vec<&T>> {
        Ok(self
            .require(T::KIND, detector)?
            .iter()
            .filter_map(T::from_action)
            .collect())
    }

    pub fn kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.categories.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &[RepairAction])> {
        self.categories.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of actions across all categories
    pub fn action_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Number of actions per category, keyed by external name
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        self.categories
            .iter()
            .map(|(kind, actions)| (kind.name(), actions.len()))
            .collect()
    }

    /// Keep only the given categories
    pub fn restricted_to(&self, kinds: &[ActionKind]) -> ActionSet {
        Self {
            categories: self
                .categories
                .iter()
                .filter(|(kind, _)| kinds.contains(kind))
                .map(|(kind, actions)| (*kind, actions.clone()))
                .collect(),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Named accessors
    // ═══════════════════════════════════════════════════════════════

    pub fn delete_statements(&self) -> impl Iterator<Item = &DeleteStatement> {
        self.of::<DeleteStatement>()
    }

    pub fn insert_statements(&self) -> impl Iterator<Item = &InsertStatement> {
        self.of::<InsertStatement>()
    }

    pub fn modify_statements(&self) -> impl Iterator<Item = &ModifyStatement> {
        self.of::<ModifyStatement>()
    }

    pub fn wrap_statements(&self) -> impl Iterator<Item = &WrapStatement> {
        self.of::<WrapStatement>()
    }

    pub fn unwrap_statements(&self) -> impl Iterator<Item = &UnwrapStatement> {
        self.of::<UnwrapStatement>()
    }

    pub fn replace_if_conditions(&self) -> impl Iterator<Item = &ReplaceIfCondition> {
        self.of::<ReplaceIfCondition>()
    }

    pub fn replace_then_branches(&self) -> impl Iterator<Item = &ReplaceThenBranch> {
        self.of::<ReplaceThenBranch>()
    }

    pub fn replace_else_branches(&self) -> impl Iterator<Item = &ReplaceElseBranch> {
        self.of::<ReplaceElseBranch>()
    }

    pub fn remove_else_branches(&self) -> impl Iterator<Item = &RemoveElseBranch> {
        self.of::<RemoveElseBranch>()
    }

    pub fn insert_else_branches(&self) -> impl Iterator<Item = &InsertElseBranch> {
        self.of::<InsertElseBranch>()
    }

    pub fn insert_else_if_branches(&self) -> impl Iterator<Item = &InsertElseIfBranch> {
        self.of::<InsertElseIfBranch>()
    }

    pub fn guard_else_branches(&self) -> impl Iterator<Item = &GuardElseBranch> {
        self.of::<GuardElseBranch>()
    }

    pub fn replace_switch_expressions(&self) -> impl Iterator<Item = &ReplaceSwitchExpression> {
        self.of::<ReplaceSwitchExpression>()
    }

    pub fn replace_loop_guards(&self) -> impl Iterator<Item = &ReplaceLoopGuard> {
        self.of::<ReplaceLoopGuard>()
    }

    pub fn replace_loop_bodies(&self) -> impl Iterator<Item = &ReplaceLoopBody> {
        self.of::<ReplaceLoopBody>()
    }

    pub fn modify_assignments(&self) -> impl Iterator<Item = &ModifyAssignment> {
        self.of::<ModifyAssignment>()
    }

    pub fn replace_assignment_rhs(&self) -> impl Iterator<Item = &ReplaceAssignmentRhs> {
        self.of::<ReplaceAssignmentRhs>()
    }

    pub fn replace_assignment_lhs(&self) -> impl Iterator<Item = &ReplaceAssignmentLhs> {
        self.of::<ReplaceAssignmentLhs>()
    }

    pub fn replace_assignment_ops(&self) -> impl Iterator<Item = &ReplaceAssignmentOp> {
        self.of::<ReplaceAssignmentOp>()
    }

    pub fn modify_calls(&self) -> impl Iterator<Item = &ModifyCall> {
        self.of::<ModifyCall>()
    }

    pub fn replace_call_targets(&self) -> impl Iterator<Item = &ReplaceCallTarget> {
        self.of::<ReplaceCallTarget>()
    }

    pub fn modify_call_args(&self) -> impl Iterator<Item = &ModifyCallArgs> {
        self.of::<ModifyCallArgs>()
    }

    pub fn insert_call_args(&self) -> impl Iterator<Item = &InsertCallArg> {
        self.of::<InsertCallArg>()
    }

    pub fn remove_call_args(&self) -> impl Iterator<Item = &RemoveCallArg> {
        self.of::<RemoveCallArg>()
    }

    pub fn replace_call_args(&self) -> impl Iterator<Item = &ReplaceCallArg> {
        self.of::<ReplaceCallArg>()
    }
}
