// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The network, the loop that fits it and the engine that runs
// it. Tensor conversion of a single sample lives in the data
// layer's batcher; everything else burn-specific lives here or
// in infra/backend.rs.
//
//   model.rs      — PestCnn: one conv block, max-pool, two dense
//                   layers, softmax output
//
//   trainer.rs    — The training loop
//                   Forward pass, cross-entropy loss, backward
//                   pass, Adam step, per-epoch validation
//
//   inferencer.rs — The inference engine
//                   Loads the artifact, preprocesses one image,
//                   returns the argmax class
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Convolutional image classifier
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;

/// Inference engine: loads the artifact and classifies images
pub mod inferencer;
