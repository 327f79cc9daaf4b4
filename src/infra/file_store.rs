// ============================================================
// Layer 6 — Local File Store
// ============================================================
// The std::fs implementation of the FileStore trait.
//
// Listings are returned in the order the operating system hands
// them back (no sorting). Symlinks are followed when deciding
// whether an entry is a file or a directory.
//
// Reference: Rust Book §9 (Error Handling)
//            std::fs documentation

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::error::PipelineError;
use crate::domain::traits::{DirEntry, EntryKind, FileStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        // create_dir_all is a no-op when the directory is already there
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        if !dir.is_dir() {
            return Err(PipelineError::MissingPath(dir.to_path_buf()).into());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        {
            let entry = entry?;
            let path  = entry.path();
            let kind  = match fs::metadata(&path) {
                Ok(meta) if meta.is_dir()  => EntryKind::Dir,
                Ok(meta) if meta.is_file() => EntryKind::File,
                _                          => EntryKind::Other,
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
            });
        }
        Ok(entries)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to).with_context(|| {
            format!("Failed to copy '{}' to '{}'", from.display(), to.display())
        })?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
