// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between image files on disk and tensor batches on
// the training device.
//
// The pipeline flows in this order:
//
//   <split>/<class>/<image files>
//       │
//       ▼
//   ImageFolder       → discovers classes and image records
//       │
//       ▼
//   Preprocessor      → decode, resize 224×224, scale to [0, 1]
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds shuffled batches to the training loop
//
// The splitter sits before all of this: it decides which image
// files end up in which split directory in the first place.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Discovers class folders and their images
pub mod loader;

/// Decodes and normalises single images
pub mod preprocessor;

/// Implements Burn's Dataset trait for decoded images
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits items into train/val/test sets
pub mod splitter;
