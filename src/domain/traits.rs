// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams the rest of the crate programs against:
//
//   FileStore       — the tree-structured file store the splitter
//                     and the folder scanner read from and write to
//   ImageClassifier — anything that maps an image file to a class
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::domain::prediction::Prediction;

// ─── FileStore ────────────────────────────────────────────────────────────────
/// What kind of entry a directory listing returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Implementations:
///   - LocalFileStore → std::fs
pub trait FileStore {
    /// Create `dir` and all parents. Succeeds if it already exists.
    fn ensure_dir(&self, dir: &Path) -> Result<()>;

    /// List the entries of `dir` in the order the store returns them.
    /// Fails with PipelineError::MissingPath if `dir` does not exist.
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>>;

    /// Copy a single file, overwriting `to` if present
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

// ─── ImageClassifier ──────────────────────────────────────────────────────────
/// Implementations:
///   - Inferencer → the persisted CNN
pub trait ImageClassifier {
    /// Predict the class of the image at `path`
    fn classify(&self, path: &Path) -> Result<Prediction>;
}
