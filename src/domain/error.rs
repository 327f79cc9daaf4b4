// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// The failure kinds every subcommand can hit. None of them are
// recoverable: the first one aborts the run and `main` exits
// with a non-zero status.
//
// Application code keeps using anyhow::Result and wraps these
// with .context(); the typed variants are still reachable with
// anyhow::Error::downcast_ref when a caller needs to tell them
// apart (tests do).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A directory or file the run depends on is absent
    #[error("Path not found: '{0}'")]
    MissingPath(PathBuf),

    /// An image could not be decoded (corrupt or unsupported format)
    #[error("Failed to decode image '{path}': {source}")]
    Decode {
        path:   PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No accelerated execution path was found
    #[error("GPU backend not available")]
    BackendUnavailable,

    /// A split contains a class folder the training split did not have
    #[error("Class '{class}' in '{dir}' is not part of the trained class map")]
    UnknownClass { class: String, dir: PathBuf },

    /// A split contains no images at all
    #[error("No images found under '{0}'")]
    EmptyDataset(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
