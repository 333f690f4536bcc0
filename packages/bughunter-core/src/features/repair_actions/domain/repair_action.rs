//! Repair actions
//!
//! One struct per category; `RepairAction` is the closed tagged variant
//! over all of them. Actions never own tree nodes, they hold `NodeId`s into
//! the before-tree (`from*`, `stmt` of deletions, ...) or the after-tree
//! (`to*`, inserted nodes, ...). The side of every reference is reported by
//! [`RepairAction::node_refs`] so cached actions can be re-validated.

use super::ActionKind;
use crate::shared::models::{EditOp, NodeId};
use serde::{Deserialize, Serialize};

/// Which tree a node reference points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Before,
    After,
}

// ═══════════════════════════════════════════════════════════════════════════
// Fundamental
// ═══════════════════════════════════════════════════════════════════════════

/// A before-statement with no counterpart after the fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub stmt: NodeId,
}

/// An after-statement with no counterpart before the fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub stmt: NodeId,
    /// After-tree parent the statement was inserted into
    pub parent: NodeId,
}

/// A surviving statement together with the edits attributed to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyStatement {
    pub from: NodeId,
    pub to: NodeId,
    pub edits: Vec<EditOp>,
}

// ═══════════════════════════════════════════════════════════════════════════
// If-statement related
// ═══════════════════════════════════════════════════════════════════════════

/// An existing statement was wrapped in a new guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapStatement {
    /// Wrapped statement (before-tree)
    pub stmt: NodeId,
    /// New if-statement (after-tree)
    pub wrapper: NodeId,
    pub guard: NodeId,
}

/// An existing guard was removed, its then-branch survives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnwrapStatement {
    /// Removed if-statement (before-tree)
    pub stmt: NodeId,
    /// Surviving statement (after-tree)
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceIfCondition {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub from_guard: NodeId,
    pub to_guard: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceThenBranch {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub from_then: NodeId,
    pub to_then: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceElseBranch {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub from_else: NodeId,
    pub to_else: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveElseBranch {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub from_else: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertElseBranch {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub els: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertElseIfBranch {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub else_if: NodeId,
}

/// The old else-body now sits under a new guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardElseBranch {
    /// Enclosing if-statement (before-tree)
    pub from_if: NodeId,
    /// Inserted guard if-statement (after-tree)
    pub to_if: NodeId,
    pub guard: NodeId,
}

// ═══════════════════════════════════════════════════════════════════════════
// Switch / loops
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceSwitchExpression {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub from_expr: NodeId,
    pub to_expr: NodeId,
}

/// Guards are optional: `for (;;)` has none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceLoopGuard {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub from_guard: Option<NodeId>,
    pub to_guard: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceLoopBody {
    pub from_stmt: NodeId,
    pub to_stmt: NodeId,
    pub from_body: NodeId,
    pub to_body: NodeId,
}

// ═══════════════════════════════════════════════════════════════════════════
// Assignments / calls: `from` is before-tree, `to` is after-tree
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyAssignment {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceAssignmentRhs {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceAssignmentLhs {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceAssignmentOp {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyCall {
    pub from: NodeId,
    pub to: NodeId,
}

/// Call targets that differ (argument lists unchanged)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceCallTarget {
    pub from: NodeId,
    pub to: NodeId,
}

/// Calls whose argument lists differ (target unchanged)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyCallArgs {
    pub from_call: NodeId,
    pub to_call: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertCallArg {
    /// After-tree call
    pub call: NodeId,
    /// Inserted argument (after-tree)
    pub arg: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveCallArg {
    /// Before-tree call
    pub call: NodeId,
    /// Removed argument (before-tree)
    pub arg: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceCallArg {
    pub from: NodeId,
    pub to: NodeId,
}

// ═══════════════════════════════════════════════════════════════════════════
// Tagged variant
// ═══════════════════════════════════════════════════════════════════════════

/// Typed access to one variant of [`RepairAction`]
pub trait ActionVariant: Sized + 'static {
    const KIND: ActionKind;

    fn from_action(action: &RepairAction) -> Option<&Self>;
}

macro_rules! repair_actions {
    ($($variant:ident => $rename:literal),+ $(,)?) => {
        /// One detected repair action, tagged by category
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum RepairAction {
            $(
                #[serde(rename = $rename)]
                $variant($variant),
            )+
        }

        impl RepairAction {
            pub fn kind(&self) -> ActionKind {
                match self {
                    $(RepairAction::$variant(_) => ActionKind::$variant,)+
                }
            }
        }

        $(
            impl ActionVariant for $variant {
                const KIND: ActionKind = ActionKind::$variant;

                fn from_action(action: &RepairAction) -> Option<&Self> {
                    match action {
                        RepairAction::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            impl From<$variant> for RepairAction {
                fn from(action: $variant) -> Self {
                    RepairAction::$variant(action)
                }
            }
        )+
    };
}

repair_actions! {
    DeleteStatement => "DeleteStatement",
    InsertStatement => "InsertStatement",
    ModifyStatement => "ModifyStatement",
    WrapStatement => "WrapStatement",
    UnwrapStatement => "UnwrapStatement",
    ReplaceIfCondition => "ReplaceIfCondition",
    ReplaceThenBranch => "ReplaceThenBranch",
    ReplaceElseBranch => "ReplaceElseBranch",
    RemoveElseBranch => "RemoveElseBranch",
    InsertElseBranch => "InsertElseBranch",
    InsertElseIfBranch => "InsertElseIfBranch",
    GuardElseBranch => "GuardElseBranch",
    ReplaceSwitchExpression => "ReplaceSwitchExpression",
    ReplaceLoopGuard => "ReplaceLoopGuard",
    ReplaceLoopBody => "ReplaceLoopBody",
    ModifyAssignment => "ModifyAssignment",
    ReplaceAssignmentRhs => "ReplaceAssignmentRHS",
    ReplaceAssignmentLhs => "ReplaceAssignmentLHS",
    ReplaceAssignmentOp => "ReplaceAssignmentOp",
    ModifyCall => "ModifyCall",
    ReplaceCallTarget => "ReplaceCallTarget",
    ModifyCallArgs => "ModifyCallArgs",
    InsertCallArg => "InsertCallArg",
    RemoveCallArg => "RemoveCallArg",
    ReplaceCallArg => "ReplaceCallArg",
}

impl RepairAction {
    /// Every node this action references, with the tree it belongs to
    pub fn node_refs(&self) -> Vec<(Side, NodeId)> {
        use Side::{After, Before};
        match self {
            RepairAction::DeleteStatement(a) => vec![(Before, a.stmt)],
            RepairAction::InsertStatement(a) => vec![(After, a.stmt), (After, a.parent)],
            RepairAction::ModifyStatement(a) => {
                let mut refs = vec![(Before, a.from), (After, a.to)];
                for edit in &a.edits {
                    refs.extend(edit.before_node().map(|n| (Before, n)));
                    refs.extend(edit.after_node().map(|n| (After, n)));
                }
                refs
            }
            RepairAction::WrapStatement(a) => {
                vec![(Before, a.stmt), (After, a.wrapper), (After, a.guard)]
            }
            RepairAction::UnwrapStatement(a) => vec![(Before, a.stmt), (After, a.to)],
            RepairAction::ReplaceIfCondition(a) => vec![
                (Before, a.from_stmt),
                (After, a.to_stmt),
                (Before, a.from_guard),
                (After, a.to_guard),
            ],
            RepairAction::ReplaceThenBranch(a) => vec![
                (Before, a.from_stmt),
                (After, a.to_stmt),
                (Before, a.from_then),
                (After, a.to_then),
            ],
            RepairAction::ReplaceElseBranch(a) => vec![
                (Before, a.from_stmt),
                (After, a.to_stmt),
                (Before, a.from_else),
                (After, a.to_else),
            ],
            RepairAction::RemoveElseBranch(a) => {
                vec![(Before, a.from_stmt), (After, a.to_stmt), (Before, a.from_else)]
            }
            RepairAction::InsertElseBranch(a) => {
                vec![(Before, a.from_stmt), (After, a.to_stmt), (After, a.els)]
            }
            RepairAction::InsertElseIfBranch(a) => {
                vec![(Before, a.from_stmt), (After, a.to_stmt), (After, a.else_if)]
            }
            RepairAction::GuardElseBranch(a) => {
                vec![(Before, a.from_if), (After, a.to_if), (After, a.guard)]
            }
            RepairAction::ReplaceSwitchExpression(a) => vec![
                (Before, a.from_stmt),
                (After, a.to_stmt),
                (Before, a.from_expr),
                (After, a.to_expr),
            ],
            RepairAction::ReplaceLoopGuard(a) => {
                let mut refs = vec![(Before, a.from_stmt), (After, a.to_stmt)];
                refs.extend(a.from_guard.map(|n| (Before, n)));
                refs.extend(a.to_guard.map(|n| (After, n)));
                refs
            }
            RepairAction::ReplaceLoopBody(a) => vec![
                (Before, a.from_stmt),
                (After, a.to_stmt),
                (Before, a.from_body),
                (After, a.to_body),
            ],
            RepairAction::ModifyAssignment(a) => vec![(Before, a.from), (After, a.to)],
            RepairAction::ReplaceAssignmentRhs(a) => vec![(Before, a.from), (After, a.to)],
            RepairAction::ReplaceAssignmentLhs(a) => vec![(Before, a.from), (After, a.to)],
            RepairAction::ReplaceAssignmentOp(a) => vec![(Before, a.from), (After, a.to)],
            RepairAction::ModifyCall(a) => vec![(Before, a.from), (After, a.to)],
            RepairAction::ReplaceCallTarget(a) => vec![(Before, a.from), (After, a.to)],
            RepairAction::ModifyCallArgs(a) => vec![(Before, a.from_call), (After, a.to_call)],
            RepairAction::InsertCallArg(a) => vec![(After, a.call), (After, a.arg)],
            RepairAction::RemoveCallArg(a) => vec![(Before, a.call), (Before, a.arg)],
            RepairAction::ReplaceCallArg(a) => vec![(Before, a.from), (After, a.to)],
        }
    }
}
