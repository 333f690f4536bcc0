//! Diff: before/after trees of one file plus their correspondence and edit script

use super::{Ast, Correspondence, EditOp, EditScript, NodeId};
use crate::errors::{BughunterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Stable identity of a diff (repository + fix + file)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiffId {
    pub repository: String,
    pub fix: String,
    pub file: String,
}

impl DiffId {
    pub fn new(
        repository: impl Into<String>,
        fix: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            fix: fix.into(),
            file: file.into(),
        }
    }

    /// File path flattened into a single cache-safe file-name stem
    pub fn file_stem(&self) -> String {
        self.file
            .trim_start_matches(['/', '\\'])
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    }
}

impl fmt::Display for DiffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.repository, self.fix, self.file)
    }
}

/// Files touched by the fix a diff belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixFiles(pub Vec<String>);

impl FixFiles {
    pub fn modifies_header_file(&self) -> bool {
        self.0.iter().any(|f| f.ends_with(".h"))
    }

    pub fn source_file_count(&self) -> usize {
        self.0.iter().filter(|f| f.ends_with(".c")).count()
    }
}

/// JSON interchange shape emitted by the external tree differ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffDocument {
    pub id: DiffId,
    pub before: Ast,
    pub after: Ast,
    /// `[before_id, after_id]` pairs
    pub mappings: Correspondence,
    /// `null` when the differ produced no script (whole-file add/remove)
    pub edits: Option<EditScript>,
    #[serde(default)]
    pub fix_files: FixFiles,
}

/// Validated diff
#[derive(Debug, Clone)]
pub struct Diff {
    id: DiffId,
    before: Ast,
    after: Ast,
    correspondence: Correspondence,
    edit_script: Option<EditScript>,
    fix_files: FixFiles,
}

impl Diff {
    /// Validate that every referenced node exists in the right tree
    pub fn new(
        id: DiffId,
        before: Ast,
        after: Ast,
        correspondence: Correspondence,
        edit_script: Option<EditScript>,
    ) -> Result<Self> {
        if before.is_empty() || after.is_empty() {
            return Err(BughunterError::invalid_input(format!(
                "{}: both trees must be non-empty",
                id
            )));
        }

        for (b, a) in correspondence.pairs() {
            check_node(&id, &before, b, "before", "correspondence")?;
            check_node(&id, &after, a, "after", "correspondence")?;
        }

        for op in edit_script.iter().flatten() {
            if let Some(b) = op.before_node() {
                check_node(&id, &before, b, "before", op.name())?;
            }
            if let Some(a) = op.after_node() {
                check_node(&id, &after, a, "after", op.name())?;
            }
        }

        let fix_files = FixFiles(vec![id.file.clone()]);
        Ok(Self {
            id,
            before,
            after,
            correspondence,
            edit_script,
            fix_files,
        })
    }

    pub fn with_fix_files(mut self, fix_files: FixFiles) -> Self {
        if !fix_files.0.is_empty() {
            self.fix_files = fix_files;
        }
        self
    }

    pub fn from_document(doc: DiffDocument) -> Result<Self> {
        let diff = Self::new(doc.id, doc.before, doc.after, doc.mappings, doc.edits)?;
        Ok(diff.with_fix_files(doc.fix_files))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let doc: DiffDocument = serde_json::from_str(&content)?;
        Self::from_document(doc)
    }

    pub fn to_document(&self) -> DiffDocument {
        DiffDocument {
            id: self.id.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            mappings: self.correspondence.clone(),
            edits: self.edit_script.clone(),
            fix_files: self.fix_files.clone(),
        }
    }

    pub fn id(&self) -> &DiffId {
        &self.id
    }

    pub fn before(&self) -> &Ast {
        &self.before
    }

    pub fn after(&self) -> &Ast {
        &self.after
    }

    pub fn correspondence(&self) -> &Correspondence {
        &self.correspondence
    }

    /// `None` when the differ produced no edit script
    pub fn edit_script(&self) -> Option<&[EditOp]> {
        self.edit_script.as_deref()
    }

    pub fn fix_files(&self) -> &FixFiles {
        &self.fix_files
    }
}

fn check_node(id: &DiffId, ast: &Ast, node: NodeId, side: &str, context: &str) -> Result<()> {
    if ast.contains(node) {
        Ok(())
    } else {
        Err(BughunterError::invalid_input(format!(
            "{}: {} references {} node {} outside a tree of {} nodes",
            id,
            context,
            side,
            node,
            ast.len()
        )))
    }
}
