// ============================================================
// Layer 3 — Prediction
// ============================================================
// The outcome of classifying one image: the output index, the
// class name stored for that index, and its probability.

/// The outcome of classifying one image
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index:      usize,
    pub class_name: String,
    /// Softmax probability of the predicted class
    pub confidence: f32,
}
