//! Action cache
//!
//! One JSON document per diff:
//!
//! ```text
//! { "version": 1, "before": <root hash>, "after": <root hash>,
//!   "actions": { "DeleteStatement": [ {"type": "DeleteStatement", "stmt": 7} ], ... } }
//! ```
//!
//! Node references are pre-order positions, so a document is only valid for
//! the exact trees it was mined from. The two root hashes pin those trees;
//! a document that fails any check is reported as corrupt and the caller
//! recomputes.

use crate::errors::{BughunterError, Result};
use crate::features::cache::{read_json, write_json_atomic, CacheError, CacheLayout, CacheResult};
use crate::features::repair_actions::domain::{ActionSet, Side};
use crate::shared::models::{Diff, DiffId, StructuralHash};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use super::DetectionContext;

pub const ACTION_CACHE_VERSION: u32 = 1;

/// Root hashes of the trees an action set was mined from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeFingerprint {
    pub before: StructuralHash,
    pub after: StructuralHash,
}

impl TreeFingerprint {
    pub fn of(ctx: &DetectionContext<'_>) -> Result<Self> {
        match (ctx.before_hashes().root(), ctx.after_hashes().root()) {
            (Some(before), Some(after)) => Ok(Self { before, after }),
            _ => Err(BughunterError::invalid_input(format!(
                "{}: cannot fingerprint an empty tree",
                ctx.diff().id()
            ))),
        }
    }
}

#[derive(Serialize)]
struct StoredActions<'a> {
    version: u32,
    before: StructuralHash,
    after: StructuralHash,
    actions: &'a ActionSet,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoadedActions {
    version: u32,
    before: StructuralHash,
    after: StructuralHash,
    actions: ActionSet,
}

/// Per-diff action cache rooted at a [`CacheLayout`]
#[derive(Debug, Clone)]
pub struct ActionCache {
    layout: CacheLayout,
}

impl ActionCache {
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    pub fn path(&self, id: &DiffId) -> PathBuf {
        self.layout.actions_path(id)
    }

    /// Cached actions of `diff`, `Ok(None)` on a plain miss
    pub fn load(&self, diff: &Diff, fingerprint: TreeFingerprint) -> CacheResult<Option<ActionSet>> {
        let path = self.path(diff.id());
        let Some(doc) = read_json::<LoadedActions>(&path)? else {
            debug!(diff = %diff.id(), "action cache miss");
            return Ok(None);
        };

        let actions = validate(doc, diff, fingerprint)?;
        debug!(
            diff = %diff.id(),
            categories = actions.len(),
            "action cache hit"
        );
        Ok(Some(actions))
    }

    /// Persist the complete action set of `id`
    pub fn store(
        &self,
        id: &DiffId,
        fingerprint: TreeFingerprint,
        actions: &ActionSet,
    ) -> CacheResult<()> {
        let doc = StoredActions {
            version: ACTION_CACHE_VERSION,
            before: fingerprint.before,
            after: fingerprint.after,
            actions,
        };
        write_json_atomic(&self.path(id), &doc)
    }
}

fn validate(doc: LoadedActions, diff: &Diff, fingerprint: TreeFingerprint) -> CacheResult<ActionSet> {
    if doc.version != ACTION_CACHE_VERSION {
        return Err(CacheError::VersionMismatch {
            found: doc.version,
            expected: ACTION_CACHE_VERSION,
        });
    }
    if doc.before != fingerprint.before || doc.after != fingerprint.after {
        return Err(CacheError::InvalidFingerprint(format!(
            "{} was cached for different trees",
            diff.id()
        )));
    }

    for (kind, actions) in doc.actions.iter() {
        for action in actions {
            if action.kind() != kind {
                return Err(CacheError::Corrupted(format!(
                    "{} action filed under {}",
                    action.kind(),
                    kind
                )));
            }
            for (side, node) in action.node_refs() {
                let ast = match side {
                    Side::Before => diff.before(),
                    Side::After => diff.after(),
                };
                if !ast.contains(node) {
                    return Err(CacheError::Corrupted(format!(
                        "{} references unknown {:?} node {}",
                        kind, side, node
                    )));
                }
            }
        }
    }
    Ok(doc.actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::repair_actions::domain::repair_action::{DeleteStatement, InsertStatement};
    use crate::features::repair_actions::domain::ActionKind;
    use crate::features::repair_actions::infrastructure::test_support::*;
    use crate::shared::models::NodeId;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_diff() -> Diff {
        let before = unit(vec![expr_stmt(call("f", vec![]))]);
        let after = unit(vec![expr_stmt(call("f", vec![])), expr_stmt(call("g", vec![]))]);
        diff_with_paths(before, after, &[("/", "/"), ("0", "0")], |_, _| vec![])
    }

    fn sample_actions(diff: &Diff) -> ActionSet {
        let mut actions = ActionSet::new();
        actions
            .insert_category(
                ActionKind::InsertStatement,
                vec![InsertStatement {
                    stmt: diff.after().at("1").unwrap(),
                    parent: diff.after().root(),
                }
                .into()],
            )
            .unwrap();
        actions.insert_category(ActionKind::DeleteStatement, vec![]).unwrap();
        actions
    }

    #[test]
    fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = ActionCache::new(CacheLayout::new(dir.path()));
        let diff = sample_diff();
        let ctx = DetectionContext::new(&diff, &[]);
        let fingerprint = TreeFingerprint::of(&ctx).unwrap();
        let actions = sample_actions(&diff);

        cache.store(diff.id(), fingerprint, &actions).unwrap();
        let loaded = cache.load(&diff, fingerprint).unwrap();
        assert_eq!(loaded, Some(actions));
    }

    #[test]
    fn test_other_trees_are_rejected() {
        let dir = TempDir::new().unwrap();
        let cache = ActionCache::new(CacheLayout::new(dir.path()));
        let diff = sample_diff();
        let ctx = DetectionContext::new(&diff, &[]);
        let fingerprint = TreeFingerprint::of(&ctx).unwrap();

        cache.store(diff.id(), fingerprint, &sample_actions(&diff)).unwrap();
        let swapped = TreeFingerprint {
            before: fingerprint.after,
            after: fingerprint.before,
        };

        let err = cache.load(&diff, swapped).unwrap_err();
        assert!(matches!(err, CacheError::InvalidFingerprint(_)));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_dangling_node_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let cache = ActionCache::new(CacheLayout::new(dir.path()));
        let diff = sample_diff();
        let ctx = DetectionContext::new(&diff, &[]);
        let fingerprint = TreeFingerprint::of(&ctx).unwrap();

        let mut actions = ActionSet::new();
        actions
            .insert_category(
                ActionKind::DeleteStatement,
                vec![DeleteStatement { stmt: NodeId(999) }.into()],
            )
            .unwrap();
        cache.store(diff.id(), fingerprint, &actions).unwrap();

        let err = cache.load(&diff, fingerprint).unwrap_err();
        assert!(matches!(err, CacheError::Corrupted(_)));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let cache = ActionCache::new(CacheLayout::new(dir.path()));
        let diff = sample_diff();
        let ctx = DetectionContext::new(&diff, &[]);
        let fingerprint = TreeFingerprint::of(&ctx).unwrap();

        cache.store(diff.id(), fingerprint, &ActionSet::new()).unwrap();
        let path = cache.path(diff.id());
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replacen("\"version\":1", "\"version\":7", 1)).unwrap();

        let err = cache.load(&diff, fingerprint).unwrap_err();
        assert!(matches!(
            err,
            CacheError::VersionMismatch {
                found: 7,
                expected: 1
            }
        ));
    }
}
