// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   file_store.rs — std::fs implementation of the FileStore trait
//                   (list / copy / ensure-directory)
//
//   checkpoint.rs — Saving and loading the model artifact.
//                   Uses Burn's CompactRecorder for the weights
//                   and JSON sidecars for the model config and
//                   the class map.
//
//   metrics.rs    — Per-epoch loss/accuracy CSV log
//
//   backend.rs    — GPU adapter lookup and backend/device selection
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// std::fs backed file store
pub mod file_store;

/// Model artifact saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Accelerator lookup and backend selection
pub mod backend;
