//! Structural hashing with Blake3
//!
//! One canonical form is shared by structural equivalence and the donor
//! pools:
//!
//! ```text
//! hash(node) = blake3_derive(mode, kind ‖ label ‖ [(child_role, hash(child))...])
//! ```
//!
//! The node's own role and span are excluded, so the same fragment hashes
//! identically wherever it appears. `Abstract` mode replaces identifier
//! labels with a single placeholder. Each mode uses its own derive-key
//! context, so an abstract hash can never equal a concrete one.

use super::{Ast, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

const CONCRETE_CONTEXT: &str = "bughunter 2016 concrete structural hash v1";
const ABSTRACT_CONTEXT: &str = "bughunter 2016 abstract structural hash v1";

/// Placeholder that replaces every identifier in abstract mode
const IDENTIFIER_PLACEHOLDER: &str = "$id";

/// Hash space selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashMode {
    /// Identifier names are significant
    Concrete,
    /// Identifier names are normalised away
    Abstract,
}

impl HashMode {
    fn context(self) -> &'static str {
        match self {
            HashMode::Concrete => CONCRETE_CONTEXT,
            HashMode::Abstract => ABSTRACT_CONTEXT,
        }
    }

    fn label_of<'a>(self, kind: NodeKind, label: Option<&'a str>) -> Option<&'a str> {
        match (self, kind) {
            (HashMode::Abstract, NodeKind::Identity) => Some(IDENTIFIER_PLACEHOLDER),
            _ => label,
        }
    }
}

/// Content-addressed identity of a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralHash(pub [u8; 32]);

impl StructuralHash {
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    pub fn from_hex(hex: &str) -> Result<Self, blake3::HexError> {
        Ok(Self(*blake3::Hash::from_hex(hex)?.as_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StructuralHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serialized as hex string
impl Serialize for StructuralHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for StructuralHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Hash of every node of one tree, in one mode
#[derive(Debug, Clone)]
pub struct NodeHashes {
    mode: HashMode,
    hashes: Vec<StructuralHash>,
}

impl NodeHashes {
    /// Hash every node bottom-up in a single reverse pre-order sweep
    pub fn compute(ast: &Ast, mode: HashMode) -> Self {
        let mut hashes = vec![StructuralHash([0u8; 32]); ast.len()];

        for idx in (0..ast.len()).rev() {
            let id = NodeId(idx as u32);
            let data = ast.node(id);
            let mut hasher = blake3::Hasher::new_derive_key(mode.context());

            write_field(&mut hasher, data.kind.as_str().as_bytes());
            match mode.label_of(data.kind, data.label.as_deref()) {
                Some(label) => {
                    hasher.update(&[1]);
                    write_field(&mut hasher, label.as_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }

            hasher.update(&(data.children.len() as u64).to_le_bytes());
            for child in &data.children {
                let role = ast.role(*child).map(|r| r.as_str()).unwrap_or("");
                write_field(&mut hasher, role.as_bytes());
                hasher.update(hashes[child.index()].as_bytes());
            }

            hashes[idx] = StructuralHash(*hasher.finalize().as_bytes());
        }

        Self { mode, hashes }
    }

    pub fn mode(&self) -> HashMode {
        self.mode
    }

    pub fn get(&self, id: NodeId) -> StructuralHash {
        self.hashes[id.index()]
    }

    /// Fingerprint of the whole tree (hash of the root)
    pub fn root(&self) -> Option<StructuralHash> {
        self.hashes.first().copied()
    }
}

/// Length-prefixed write so adjacent fields cannot run together
fn write_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
