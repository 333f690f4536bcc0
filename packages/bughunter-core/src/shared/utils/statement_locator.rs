//! Statement Locator
//!
//! Walks from a node towards the root until a statement is found.

use crate::shared::models::{Ast, NodeId};

/// Nearest enclosing statement of `node`, including `node` itself
///
/// Pure, O(depth). Returns `None` once the root is passed without meeting
/// a statement.
pub fn nearest_enclosing_statement(ast: &Ast, node: NodeId) -> Option<NodeId> {
    matching_ancestor(ast, node, |id| ast.is_statement(id))
}

/// Nearest enclosing statement of `node` that satisfies `is_mapped`
///
/// Used to attribute edits inside freshly inserted statements to the
/// surviving statement they were inserted into.
pub fn nearest_mapped_statement<F>(ast: &Ast, node: NodeId, is_mapped: F) -> Option<NodeId>
where
    F: Fn(NodeId) -> bool,
{
    matching_ancestor(ast, node, |id| ast.is_statement(id) && is_mapped(id))
}

/// Nearest ancestor of `node` (including `node`) satisfying `predicate`
pub fn matching_ancestor<F>(ast: &Ast, node: NodeId, predicate: F) -> Option<NodeId>
where
    F: Fn(NodeId) -> bool,
{
    let mut current = Some(node);
    while let Some(id) = current {
        if predicate(id) {
            return Some(id);
        }
        current = ast.parent(id);
    }
    None
}
