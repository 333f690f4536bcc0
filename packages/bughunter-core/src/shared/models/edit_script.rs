//! Tree edit script
//!
//! Node ids on the `before` side refer to the before-tree, ids on the
//! `after` side to the after-tree:
//!
//! | op     | before-tree          | after-tree         |
//! |--------|----------------------|--------------------|
//! | Insert | -                    | `inserted`         |
//! | Delete | `deleted`            | -                  |
//! | Update | `before`             | `after`            |
//! | Move   | `moved_from`         | `moved_to`         |

use super::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Insert { inserted: NodeId },
    Delete { deleted: NodeId },
    Update { before: NodeId, after: NodeId },
    Move { moved_from: NodeId, moved_to: NodeId },
}

impl EditOp {
    /// Node of this op that lives in the before-tree
    pub fn before_node(&self) -> Option<NodeId> {
        match *self {
            EditOp::Insert { .. } => None,
            EditOp::Delete { deleted } => Some(deleted),
            EditOp::Update { before, .. } => Some(before),
            EditOp::Move { moved_from, .. } => Some(moved_from),
        }
    }

    /// Node of this op that lives in the after-tree
    pub fn after_node(&self) -> Option<NodeId> {
        match *self {
            EditOp::Insert { inserted } => Some(inserted),
            EditOp::Delete { .. } => None,
            EditOp::Update { after, .. } => Some(after),
            EditOp::Move { moved_to, .. } => Some(moved_to),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Insert { .. } => "insert",
            EditOp::Delete { .. } => "delete",
            EditOp::Update { .. } => "update",
            EditOp::Move { .. } => "move",
        }
    }
}

/// Ordered edit script (order carries no meaning for the detectors)
pub type EditScript = Vec<EditOp>;
