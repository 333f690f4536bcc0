//! Shared models

mod ast;
mod correspondence;
mod diff;
mod edit_script;
mod span;
mod structural_hash;

pub use ast::{Ast, NodeCategory, NodeData, NodeId, NodeKind, NodePath, Role, TreeNode};
pub use correspondence::{Correspondence, CorrespondenceError};
pub use diff::{Diff, DiffDocument, DiffId, FixFiles};
pub use edit_script::{EditOp, EditScript};
pub use span::Span;
pub use structural_hash::{HashMode, NodeHashes, StructuralHash};
