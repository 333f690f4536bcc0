//! Test data builders

use bughunter_core::{Ast, Correspondence, Diff, DiffId, EditOp, NodeKind, Role, TreeNode};

pub fn unit(children: Vec<TreeNode>) -> TreeNode {
    TreeNode::new(NodeKind::TranslationUnit).with_children(children)
}

pub fn ident(name: &str) -> TreeNode {
    TreeNode::leaf(NodeKind::Identity, name)
}

pub fn constant(value: &str) -> TreeNode {
    TreeNode::leaf(NodeKind::Constant, value)
}

pub fn binary(lhs: TreeNode, op: &str, rhs: TreeNode) -> TreeNode {
    TreeNode::new(NodeKind::Binary)
        .with_child(lhs.with_role(Role::Lhs))
        .with_child(TreeNode::leaf(NodeKind::Operator, op).with_role(Role::Op))
        .with_child(rhs.with_role(Role::Rhs))
}

pub fn assign(lhs: TreeNode, op: &str, rhs: TreeNode) -> TreeNode {
    TreeNode::new(NodeKind::Assignment)
        .with_child(lhs.with_role(Role::Lhs))
        .with_child(TreeNode::leaf(NodeKind::Operator, op).with_role(Role::Op))
        .with_child(rhs.with_role(Role::Rhs))
}

pub fn call(target: &str, args: Vec<TreeNode>) -> TreeNode {
    TreeNode::new(NodeKind::FunctionCall)
        .with_child(ident(target).with_role(Role::Target))
        .with_child(
            TreeNode::new(NodeKind::ExprList)
                .with_role(Role::Args)
                .with_children(args),
        )
}

pub fn expr_stmt(expr: TreeNode) -> TreeNode {
    TreeNode::new(NodeKind::ExprStatement).with_child(expr)
}

pub fn block(stmts: Vec<TreeNode>) -> TreeNode {
    TreeNode::new(NodeKind::Block).with_children(stmts)
}

pub fn if_then(cond: TreeNode, then: TreeNode) -> TreeNode {
    TreeNode::new(NodeKind::IfElse)
        .with_child(cond.with_role(Role::Condition))
        .with_child(then.with_role(Role::Then))
}

pub fn if_else(cond: TreeNode, then: TreeNode, els: TreeNode) -> TreeNode {
    if_then(cond, then).with_child(els.with_role(Role::Else))
}

pub fn while_loop(cond: TreeNode, body: TreeNode) -> TreeNode {
    TreeNode::new(NodeKind::While)
        .with_child(cond.with_role(Role::Condition))
        .with_child(body.with_role(Role::Body))
}

/// Every node path of a tree, in pre-order
pub fn paths_of(tree: &TreeNode) -> Vec<String> {
    let ast = Ast::from_tree(tree.clone());
    ast.ids().map(|id| ast.path_of(id).to_string()).collect()
}

enum PathEdit {
    Insert(String),
    Delete(String),
    Update(String, String),
    Move(String, String),
}

/// Builder for a [`Diff`] whose mappings and edits are given as node paths
pub struct DiffBuilder {
    id: DiffId,
    before: Ast,
    after: Ast,
    pairs: Vec<(String, String)>,
    edits: Vec<PathEdit>,
    with_script: bool,
}

impl DiffBuilder {
    pub fn new(before: TreeNode, after: TreeNode) -> Self {
        Self {
            id: DiffId::new("php-src", "5e1b7f2", "main/main.c"),
            before: Ast::from_tree(before),
            after: Ast::from_tree(after),
            pairs: Vec::new(),
            edits: Vec::new(),
            with_script: true,
        }
    }

    pub fn id(mut self, repository: &str, fix: &str, file: &str) -> Self {
        self.id = DiffId::new(repository, fix, file);
        self
    }

    pub fn map(mut self, before: &str, after: &str) -> Self {
        self.pairs.push((before.to_string(), after.to_string()));
        self
    }

    /// Map each path to the same path in the other tree
    pub fn map_same<S: AsRef<str>>(mut self, paths: &[S]) -> Self {
        for path in paths {
            let path = path.as_ref().to_string();
            self.pairs.push((path.clone(), path));
        }
        self
    }

    pub fn insert(mut self, after: &str) -> Self {
        self.edits.push(PathEdit::Insert(after.to_string()));
        self
    }

    /// Insert the after-node at `after` and all of its descendants
    pub fn insert_subtree(mut self, after: &str) -> Self {
        let root = self.after_at(after);
        let paths: Vec<String> = self
            .after
            .subtree(root)
            .map(|id| self.after.path_of(id).to_string())
            .collect();
        self.edits.extend(paths.into_iter().map(PathEdit::Insert));
        self
    }

    pub fn delete(mut self, before: &str) -> Self {
        self.edits.push(PathEdit::Delete(before.to_string()));
        self
    }

    /// Delete the before-node at `before` and all of its descendants
    pub fn delete_subtree(mut self, before: &str) -> Self {
        let root = self.before_at(before);
        let paths: Vec<String> = self
            .before
            .subtree(root)
            .map(|id| self.before.path_of(id).to_string())
            .collect();
        self.edits.extend(paths.into_iter().map(PathEdit::Delete));
        self
    }

    pub fn update(mut self, before: &str, after: &str) -> Self {
        self.edits
            .push(PathEdit::Update(before.to_string(), after.to_string()));
        self
    }

    pub fn move_node(mut self, before: &str, after: &str) -> Self {
        self.edits
            .push(PathEdit::Move(before.to_string(), after.to_string()));
        self
    }

    /// The differ produced no edit script
    pub fn without_script(mut self) -> Self {
        self.with_script = false;
        self
    }

    pub fn build(self) -> Diff {
        let pairs: Vec<_> = self
            .pairs
            .iter()
            .map(|(b, a)| (self.before_at(b), self.after_at(a)))
            .collect();
        let correspondence = Correspondence::from_pairs(pairs).expect("injective mapping");

        let script = self.with_script.then(|| {
            self.edits
                .iter()
                .map(|edit| match edit {
                    PathEdit::Insert(a) => EditOp::Insert {
                        inserted: self.after_at(a),
                    },
                    PathEdit::Delete(b) => EditOp::Delete {
                        deleted: self.before_at(b),
                    },
                    PathEdit::Update(b, a) => EditOp::Update {
                        before: self.before_at(b),
                        after: self.after_at(a),
                    },
                    PathEdit::Move(b, a) => EditOp::Move {
                        moved_from: self.before_at(b),
                        moved_to: self.after_at(a),
                    },
                })
                .collect()
        });

        Diff::new(self.id, self.before, self.after, correspondence, script).expect("valid diff")
    }

    fn before_at(&self, path: &str) -> bughunter_core::NodeId {
        self.before
            .at(path)
            .unwrap_or_else(|| panic!("no before node at {}", path))
    }

    fn after_at(&self, path: &str) -> bughunter_core::NodeId {
        self.after
            .at(path)
            .unwrap_or_else(|| panic!("no after node at {}", path))
    }
}
