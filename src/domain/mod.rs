// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that define the core
// concepts of the system: classes, image records, split ratios,
// and the errors a run can end with.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Class name ↔ integer label mapping
pub mod class_map;

// An image file and the class folder it came from
pub mod image_record;

// The result of classifying one image
pub mod prediction;

// Split ratios and the train/val/test assignment
pub mod split;

// The error taxonomy shared by all subcommands
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
