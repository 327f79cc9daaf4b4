// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one subcommand (split, train or test).
//
// Rules for this layer:
//   - No ML math or model code here
//   - Filesystem access goes through the FileStore trait
//   - Only workflow coordination
//
// Every use case borrows a PipelineConfig; none of them read
// process-wide constants.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Paths, ratios and hyperparameters for every workflow
pub mod config;

// Dataset → train / val / test folders
pub mod split_use_case;

// The training workflow
pub mod train_use_case;

// Prediction over the test split
pub mod evaluate_use_case;
