//! Bidirectional node correspondence
//!
//! A pair of partial injective maps between the before-tree and the
//! after-tree, built once per diff and shared read-only by every detector.

use super::NodeId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrespondenceError {
    #[error("before node {before} is mapped to both {first} and {second}")]
    BeforeMappedTwice {
        before: NodeId,
        first: NodeId,
        second: NodeId,
    },

    #[error("after node {after} is mapped from both {first} and {second}")]
    NotInjective {
        after: NodeId,
        first: NodeId,
        second: NodeId,
    },
}

/// Invariant-checked node mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correspondence {
    before_to_after: FxHashMap<NodeId, NodeId>,
    after_to_before: FxHashMap<NodeId, NodeId>,
}

impl Correspondence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(before, after)` pairs, rejecting any pair that breaks
    /// injectivity in either direction. Repeating an identical pair is allowed.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, CorrespondenceError>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut correspondence = Self::new();
        for (before, after) in pairs {
            correspondence.insert(before, after)?;
        }
        Ok(correspondence)
    }

    fn insert(&mut self, before: NodeId, after: NodeId) -> Result<(), CorrespondenceError> {
        if let Some(&existing) = self.before_to_after.get(&before) {
            if existing != after {
                return Err(CorrespondenceError::BeforeMappedTwice {
                    before,
                    first: existing,
                    second: after,
                });
            }
            return Ok(());
        }
        if let Some(&existing) = self.after_to_before.get(&after) {
            return Err(CorrespondenceError::NotInjective {
                after,
                first: existing,
                second: before,
            });
        }

        self.before_to_after.insert(before, after);
        self.after_to_before.insert(after, before);
        Ok(())
    }

    /// Counterpart of a before-node in the after-tree
    pub fn after(&self, before: NodeId) -> Option<NodeId> {
        self.before_to_after.get(&before).copied()
    }

    /// Counterpart of an after-node in the before-tree
    pub fn before(&self, after: NodeId) -> Option<NodeId> {
        self.after_to_before.get(&after).copied()
    }

    pub fn is_mapped_before(&self, before: NodeId) -> bool {
        self.before_to_after.contains_key(&before)
    }

    pub fn is_mapped_after(&self, after: NodeId) -> bool {
        self.after_to_before.contains_key(&after)
    }

    pub fn len(&self) -> usize {
        self.before_to_after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before_to_after.is_empty()
    }

    /// Pairs sorted by before-id
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<_> = self
            .before_to_after
            .iter()
            .map(|(before, after)| (*before, *after))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

impl Serialize for Correspondence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.pairs().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Correspondence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let pairs = Vec::<(NodeId, NodeId)>::deserialize(deserializer)?;
        Self::from_pairs(pairs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_lookup() {
        let c = Correspondence::from_pairs([(NodeId(1), NodeId(4)), (NodeId(2), NodeId(5))]).unwrap();
        assert_eq!(c.after(NodeId(1)), Some(NodeId(4)));
        assert_eq!(c.before(NodeId(5)), Some(NodeId(2)));
        assert_eq!(c.after(NodeId(3)), None);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_rejects_non_injective_pairs() {
        let err = Correspondence::from_pairs([(NodeId(1), NodeId(4)), (NodeId(2), NodeId(4))])
            .unwrap_err();
        assert!(matches!(err, CorrespondenceError::NotInjective { .. }));

        let err = Correspondence::from_pairs([(NodeId(1), NodeId(4)), (NodeId(1), NodeId(5))])
            .unwrap_err();
        assert!(matches!(err, CorrespondenceError::BeforeMappedTwice { .. }));
    }

    #[test]
    fn test_duplicate_identical_pair_is_accepted() {
        let c = Correspondence::from_pairs([(NodeId(1), NodeId(4)), (NodeId(1), NodeId(4))]).unwrap();
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_serde_as_sorted_pairs() {
        let c = Correspondence::from_pairs([(NodeId(3), NodeId(0)), (NodeId(1), NodeId(2))]).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[[1,2],[3,0]]");
        let decoded: Correspondence = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, c);

        assert!(serde_json::from_str::<Correspondence>("[[1,2],[3,2]]").is_err());
    }
}
