// ============================================================
// Layer 3 — ImageRecord Domain Type
// ============================================================
// One image file on disk and the class folder it was found in.
// Records are created by the folder scanner and never mutated.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Full path to the image file
    pub path: PathBuf,

    /// Name of the class folder the image lives in
    pub class_name: String,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, class_name: impl Into<String>) -> Self {
        Self {
            path:       path.into(),
            class_name: class_name.into(),
        }
    }

    /// The bare file name, used as the copy target name by the splitter
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
