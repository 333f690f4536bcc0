//! Repair action categories
//!
//! Declaration order is the pipeline order: every category is declared
//! after all of the categories it depends on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category identifier
///
/// The enum ensures exhaustive matching and type safety; `name()` is the
/// stable external name used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    // ═══════════════════════════════════════════════════════════════
    // Fundamental
    // ═══════════════════════════════════════════════════════════════
    DeleteStatement,
    InsertStatement,
    ModifyStatement,

    // ═══════════════════════════════════════════════════════════════
    // If-statement related
    // ═══════════════════════════════════════════════════════════════
    WrapStatement,
    UnwrapStatement,
    ReplaceIfCondition,
    ReplaceThenBranch,
    ReplaceElseBranch,
    RemoveElseBranch,
    InsertElseBranch,
    InsertElseIfBranch,
    GuardElseBranch,

    // ═══════════════════════════════════════════════════════════════
    // Switch / loops
    // ═══════════════════════════════════════════════════════════════
    ReplaceSwitchExpression,
    ReplaceLoopGuard,
    ReplaceLoopBody,

    // ═══════════════════════════════════════════════════════════════
    // Assignments
    // ═══════════════════════════════════════════════════════════════
    ModifyAssignment,
    #[serde(rename = "ReplaceAssignmentRHS")]
    ReplaceAssignmentRhs,
    #[serde(rename = "ReplaceAssignmentLHS")]
    ReplaceAssignmentLhs,
    ReplaceAssignmentOp,

    // ═══════════════════════════════════════════════════════════════
    // Function calls
    // ═══════════════════════════════════════════════════════════════
    ModifyCall,
    ReplaceCallTarget,
    ModifyCallArgs,
    InsertCallArg,
    RemoveCallArg,
    ReplaceCallArg,
}

impl ActionKind {
    /// Every category, in pipeline order
    pub const ALL: [ActionKind; 25] = [
        Self::DeleteStatement,
        Self::InsertStatement,
        Self::ModifyStatement,
        Self::WrapStatement,
        Self::UnwrapStatement,
        Self::ReplaceIfCondition,
        Self::ReplaceThenBranch,
        Self::ReplaceElseBranch,
        Self::RemoveElseBranch,
        Self::InsertElseBranch,
        Self::InsertElseIfBranch,
        Self::GuardElseBranch,
        Self::ReplaceSwitchExpression,
        Self::ReplaceLoopGuard,
        Self::ReplaceLoopBody,
        Self::ModifyAssignment,
        Self::ReplaceAssignmentRhs,
        Self::ReplaceAssignmentLhs,
        Self::ReplaceAssignmentOp,
        Self::ModifyCall,
        Self::ReplaceCallTarget,
        Self::ModifyCallArgs,
        Self::InsertCallArg,
        Self::RemoveCallArg,
        Self::ReplaceCallArg,
    ];

    /// Stable external name
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeleteStatement => "DeleteStatement",
            Self::InsertStatement => "InsertStatement",
            Self::ModifyStatement => "ModifyStatement",
            Self::WrapStatement => "WrapStatement",
            Self::UnwrapStatement => "UnwrapStatement",
            Self::ReplaceIfCondition => "ReplaceIfCondition",
            Self::ReplaceThenBranch => "ReplaceThenBranch",
            Self::ReplaceElseBranch => "ReplaceElseBranch",
            Self::RemoveElseBranch => "RemoveElseBranch",
            Self::InsertElseBranch => "InsertElseBranch",
            Self::InsertElseIfBranch => "InsertElseIfBranch",
            Self::GuardElseBranch => "GuardElseBranch",
            Self::ReplaceSwitchExpression => "ReplaceSwitchExpression",
            Self::ReplaceLoopGuard => "ReplaceLoopGuard",
            Self::ReplaceLoopBody => "ReplaceLoopBody",
            Self::ModifyAssignment => "ModifyAssignment",
            Self::ReplaceAssignmentRhs => "ReplaceAssignmentRHS",
            Self::ReplaceAssignmentLhs => "ReplaceAssignmentLHS",
            Self::ReplaceAssignmentOp => "ReplaceAssignmentOp",
            Self::ModifyCall => "ModifyCall",
            Self::ReplaceCallTarget => "ReplaceCallTarget",
            Self::ModifyCallArgs => "ModifyCallArgs",
            Self::InsertCallArg => "InsertCallArg",
            Self::RemoveCallArg => "RemoveCallArg",
            Self::ReplaceCallArg => "ReplaceCallArg",
        }
    }

    /// Categories that must be mined before this one
    pub fn dependencies(&self) -> &'static [ActionKind] {
        use ActionKind::*;
        match self {
            DeleteStatement | InsertStatement | ModifyStatement => &[],
            WrapStatement => &[DeleteStatement, InsertStatement, ModifyStatement],
            UnwrapStatement => &[DeleteStatement],
            ReplaceIfCondition => &[ModifyStatement],
            ReplaceThenBranch | ReplaceElseBranch | RemoveElseBranch => &[],
            InsertElseBranch | InsertElseIfBranch => &[ModifyStatement],
            GuardElseBranch => &[InsertStatement],
            ReplaceSwitchExpression | ReplaceLoopGuard => &[ModifyStatement],
            ReplaceLoopBody => &[],
            ModifyAssignment => &[ModifyStatement],
            ReplaceAssignmentRhs | ReplaceAssignmentLhs | ReplaceAssignmentOp => {
                &[ModifyAssignment]
            }
            ModifyCall => &[ModifyStatement],
            ReplaceCallTarget | ModifyCallArgs => &[ModifyCall],
            InsertCallArg | RemoveCallArg | ReplaceCallArg => &[ModifyCallArgs],
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown repair action category '{}'", s))
    }
}
