//! Arena-backed syntax tree
//!
//! `Ast` stores one version of a source file as a flat arena. Node ids are
//! pre-order positions, so a node's subtree is the contiguous id range
//! `[id, subtree_end)` and every child id is greater than its parent's.
//!
//! Trees are only ever built from a nested [`TreeNode`] description (the
//! shape the external differ emits), which keeps that numbering invariant
//! impossible to violate.

use super::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pre-order position of a node inside one `Ast`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability tag of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Statement,
    Expression,
    /// Structural syntax that is neither (argument lists, operators, ...)
    Syntax,
}

/// Closed set of node kinds understood by the detectors and the pool builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // ═══════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════
    Block,
    IfElse,
    Switch,
    While,
    DoWhile,
    For,
    ExprStatement,
    Return,
    Break,
    Continue,
    Goto,
    Labeled,
    Case,
    Default,
    Declaration,
    Empty,

    // ═══════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════
    Assignment,
    FunctionCall,
    /// Identifier reference
    Identity,
    Constant,
    Binary,
    Unary,
    Ternary,
    ArrayAccess,
    FieldAccess,
    Cast,
    SizeOf,

    // ═══════════════════════════════════════════════════════════════
    // Other syntax
    // ═══════════════════════════════════════════════════════════════
    TranslationUnit,
    FunctionDef,
    Operator,
    ExprList,
    TypeName,
    Opaque,
}

impl NodeKind {
    pub fn category(self) -> NodeCategory {
        match self {
            Self::Block
            | Self::IfElse
            | Self::Switch
            | Self::While
            | Self::DoWhile
            | Self::For
            | Self::ExprStatement
            | Self::Return
            | Self::Break
            | Self::Continue
            | Self::Goto
            | Self::Labeled
            | Self::Case
            | Self::Default
            | Self::Declaration
            | Self::Empty => NodeCategory::Statement,

            Self::Assignment
            | Self::FunctionCall
            | Self::Identity
            | Self::Constant
            | Self::Binary
            | Self::Unary
            | Self::Ternary
            | Self::ArrayAccess
            | Self::FieldAccess
            | Self::Cast
            | Self::SizeOf => NodeCategory::Expression,

            Self::TranslationUnit
            | Self::FunctionDef
            | Self::Operator
            | Self::ExprList
            | Self::TypeName
            | Self::Opaque => NodeCategory::Syntax,
        }
    }

    pub fn is_statement(self) -> bool {
        self.category() == NodeCategory::Statement
    }

    pub fn is_expression(self) -> bool {
        self.category() == NodeCategory::Expression
    }

    pub fn is_loop(self) -> bool {
        matches!(self, Self::While | Self::DoWhile | Self::For)
    }

    /// Stable name used in canonical hashing
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::IfElse => "if_else",
            Self::Switch => "switch",
            Self::While => "while",
            Self::DoWhile => "do_while",
            Self::For => "for",
            Self::ExprStatement => "expr_statement",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Goto => "goto",
            Self::Labeled => "labeled",
            Self::Case => "case",
            Self::Default => "default",
            Self::Declaration => "declaration",
            Self::Empty => "empty",
            Self::Assignment => "assignment",
            Self::FunctionCall => "function_call",
            Self::Identity => "identity",
            Self::Constant => "constant",
            Self::Binary => "binary",
            Self::Unary => "unary",
            Self::Ternary => "ternary",
            Self::ArrayAccess => "array_access",
            Self::FieldAccess => "field_access",
            Self::Cast => "cast",
            Self::SizeOf => "size_of",
            Self::TranslationUnit => "translation_unit",
            Self::FunctionDef => "function_def",
            Self::Operator => "operator",
            Self::ExprList => "expr_list",
            Self::TypeName => "type_name",
            Self::Opaque => "opaque",
        }
    }
}

/// Role a child plays inside its parent
///
/// Replaces role-specific node subclasses: an `IfElse` is simply a node
/// whose children carry `Condition`, `Then` and (optionally) `Else`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Condition,
    Then,
    Else,
    Body,
    SwitchExpr,
    Init,
    After,
    Lhs,
    Op,
    Rhs,
    Target,
    Args,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Condition => "condition",
            Self::Then => "then",
            Self::Else => "else",
            Self::Body => "body",
            Self::SwitchExpr => "switch_expr",
            Self::Init => "init",
            Self::After => "after",
            Self::Lhs => "lhs",
            Self::Op => "op",
            Self::Rhs => "rhs",
            Self::Target => "target",
            Self::Args => "args",
        }
    }
}

/// Nested tree description (interchange shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            label: None,
            role: None,
            span: None,
            children: Vec::new(),
        }
    }

    /// Leaf with a label (identifier name, literal text, operator symbol)
    pub fn leaf(kind: NodeKind, label: impl Into<String>) -> Self {
        Self::new(kind).with_label(label)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Arena entry
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub label: Option<String>,
    pub role: Option<Role>,
    pub span: Option<Span>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// One past the last id of this node's subtree
    subtree_end: u32,
}

/// Slash-separated child-index path from the root (`"0/2/1"`, root is `"/"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodePath(pub Vec<u32>);

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}

impl FromStr for NodePath {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        trimmed
            .split('/')
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()
            .map(Self)
    }
}

/// One version of a source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TreeNode", into = "TreeNode")]
pub struct Ast {
    nodes: Vec<NodeData>,
}

impl Ast {
    /// Build the arena from a nested description, numbering nodes in pre-order
    pub fn from_tree(root: TreeNode) -> Self {
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<(TreeNode, Option<NodeId>)> = vec![(root, None)];

        while let Some((tree, parent)) = stack.pop() {
            let id = NodeId(nodes.len() as u32);
            if let Some(parent) = parent {
                nodes[parent.index()].children.push(id);
            }

            let TreeNode {
                kind,
                label,
                role,
                span,
                children,
            } = tree;

            nodes.push(NodeData {
                kind,
                label,
                role,
                span,
                parent,
                children: Vec::with_capacity(children.len()),
                subtree_end: 0,
            });

            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        // Children always follow their parent, so a reverse sweep sees them first
        for idx in (0..nodes.len()).rev() {
            let end = nodes[idx]
                .children
                .last()
                .map(|last| nodes[last.index()].subtree_end)
                .unwrap_or(idx as u32 + 1);
            nodes[idx].subtree_end = end;
        }

        Self { nodes }
    }

    /// Rebuild the nested description
    pub fn to_tree(&self) -> TreeNode {
        let mut built: Vec<Option<TreeNode>> = vec![None; self.nodes.len()];

        for idx in (0..self.nodes.len()).rev() {
            let data = &self.nodes[idx];
            let children = data
                .children
                .iter()
                .filter_map(|child| built[child.index()].take())
                .collect();
            built[idx] = Some(TreeNode {
                kind: data.kind,
                label: data.label.clone(),
                role: data.role,
                span: data.span,
                children,
            });
        }

        built
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(|| TreeNode::new(NodeKind::TranslationUnit))
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    /// Node data for an id known to belong to this tree
    ///
    /// # Panics
    /// Panics if `id` is not a node of this tree. Ids handed out by this
    /// tree (and ids validated by `Diff::new`) always are.
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).label.as_deref()
    }

    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.node(id).role
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn is_statement(&self, id: NodeId) -> bool {
        self.kind(id).is_statement()
    }

    /// All ids in pre-order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// `id` and all of its descendants, in pre-order
    pub fn subtree(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        let end = self.node(id).subtree_end;
        (id.0..end).map(NodeId)
    }

    /// True if `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor <= node && node.0 < self.node(ancestor).subtree_end
    }

    /// Ids satisfying `predicate`, in pre-order
    pub fn collect<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&NodeData) -> bool,
    {
        self.ids().filter(|id| predicate(self.node(*id))).collect()
    }

    /// Every statement of the tree, in pre-order
    pub fn statements(&self) -> Vec<NodeId> {
        self.collect(|n| n.kind.is_statement())
    }

    // ═══════════════════════════════════════════════════════════════
    // Role accessors
    // ═══════════════════════════════════════════════════════════════

    pub fn child_with_role(&self, id: NodeId, role: Role) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.role(*child) == Some(role))
    }

    /// Guard of an if/loop (`None` for `for (;;)`)
    pub fn condition(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Condition)
    }

    pub fn then_branch(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Then)
    }

    pub fn else_branch(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Else)
    }

    pub fn body(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Body)
    }

    pub fn switch_expr(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::SwitchExpr)
    }

    pub fn loop_init(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Init)
    }

    pub fn loop_after(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::After)
    }

    pub fn lhs(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Lhs)
    }

    pub fn op(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Op)
    }

    pub fn rhs(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Rhs)
    }

    pub fn call_target(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Target)
    }

    /// Argument-list node of a call
    pub fn call_args(&self, id: NodeId) -> Option<NodeId> {
        self.child_with_role(id, Role::Args)
    }

    /// Ordered arguments of a call (empty when it has no argument list)
    pub fn call_arguments(&self, id: NodeId) -> &[NodeId] {
        match self.call_args(id) {
            Some(list) => self.children(list),
            None => &[],
        }
    }

    /// A block holding exactly one child stands for that child
    pub fn unwrap_singleton_block(&self, id: NodeId) -> NodeId {
        match self.children(id) {
            [only] if self.kind(id) == NodeKind::Block => *only,
            _ => id,
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Paths
    // ═══════════════════════════════════════════════════════════════

    pub fn path_of(&self, id: NodeId) -> NodePath {
        let mut steps = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let position = self
                .children(parent)
                .iter()
                .position(|child| *child == current)
                .unwrap_or_default();
            steps.push(position as u32);
            current = parent;
        }
        steps.reverse();
        NodePath(steps)
    }

    pub fn resolve(&self, path: &NodePath) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }
        let mut current = self.root();
        for step in &path.0 {
            current = *self.children(current).get(*step as usize)?;
        }
        Some(current)
    }

    /// Resolve a path written as `"0/1/2"`
    pub fn at(&self, path: &str) -> Option<NodeId> {
        let path = NodePath::from_str(path).ok()?;
        self.resolve(&path)
    }
}

impl From<TreeNode> for Ast {
    fn from(tree: TreeNode) -> Self {
        Ast::from_tree(tree)
    }
}

impl From<Ast> for TreeNode {
    fn from(ast: Ast) -> Self {
        ast.to_tree()
    }
}
