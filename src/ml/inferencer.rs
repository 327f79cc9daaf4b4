// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads the persisted classifier once and predicts the class of
// individual image files.
//
//   path → Preprocessor (same image_size as training)
//        → [1, H, W, 3] tensor
//        → PestCnn::forward_probs
//        → argmax over the class axis
//
// The class map stored next to the weights turns the index back
// into a folder name.
//
// Reference: Burn Book §6 (Inference)

use anyhow::{anyhow, Result};
use burn::prelude::*;
use std::path::Path;

use crate::data::{batcher::pixel_tensor_to_burn, preprocessor::Preprocessor};
use crate::domain::class_map::ClassMap;
use crate::domain::prediction::Prediction;
use crate::domain::traits::ImageClassifier;
use crate::infra::checkpoint::ModelStore;
use crate::ml::model::PestCnn;

pub struct Inferencer<B: Backend> {
    model:        PestCnn<B>,
    classes:      ClassMap,
    preprocessor: Preprocessor,
    device:       B::Device,
}

impl<B: Backend> Inferencer<B> {
    /// Restore the artifact in `model_dir` onto `device`
    pub fn load(model_dir: &Path, device: B::Device) -> Result<Self> {
        let loaded = ModelStore::new(model_dir).load::<B>(&device)?;
        let preprocessor = Preprocessor::new(loaded.config.image_size);
        Ok(Self::from_parts(loaded.model, loaded.classes, preprocessor, device))
    }

    pub fn from_parts(
        model:        PestCnn<B>,
        classes:      ClassMap,
        preprocessor: Preprocessor,
        device:       B::Device,
    ) -> Self {
        Self { model, classes, preprocessor, device }
    }

    /// Classify the image file at `path`
    pub fn predict(&self, path: &Path) -> Result<Prediction> {
        let pixels = self.preprocessor.load(path)?;
        let input  = pixel_tensor_to_burn::<B>(pixels, &self.device);
        self.predict_tensor(input)
    }

    /// Classify an already preprocessed [1, H, W, 3] tensor
    pub fn predict_tensor(&self, input: Tensor<B, 4>) -> Result<Prediction> {
        let probs: Vec<f32> = self
            .model
            .forward_probs(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read model output: {e:?}"))?;

        let (index, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .fold((0usize, f32::NEG_INFINITY), |best, (i, p)| {
                if p > best.1 { (i, p) } else { best }
            });

        let class_name = self
            .classes
            .name_of(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("class {index}"));

        tracing::debug!("Predicted {} ({}) p={:.4}", index, class_name, confidence);
        Ok(Prediction { index, class_name, confidence })
    }
}

impl<B: Backend> ImageClassifier for Inferencer<B> {
    fn classify(&self, path: &Path) -> Result<Prediction> {
        self.predict(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::PestCnnConfig;
    use burn::backend::NdArray;
    use image::{Rgb, RgbImage};

    type TestBackend = NdArray;

    const NAMES: [&str; 3] = ["aphids", "slug", "whitefly"];

    fn untrained(num_classes: usize) -> Inferencer<TestBackend> {
        let device  = Default::default();
        let config  = PestCnnConfig::new(num_classes).with_image_size(8);
        let classes: ClassMap = NAMES.into_iter().take(num_classes).collect();
        Inferencer::from_parts(config.init(&device), classes, Preprocessor::new(8), device)
    }

    #[test]
    fn test_prediction_is_a_known_class() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("leaf.png");
        RgbImage::from_pixel(20, 12, Rgb([30, 200, 40])).save(&path).unwrap();

        let inferencer = untrained(3);
        let prediction = inferencer.predict(&path).unwrap();

        assert!(prediction.index < 3);
        assert_eq!(prediction.class_name, NAMES[prediction.index]);
        assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);

        let classifier: &dyn ImageClassifier = &inferencer;
        assert_eq!(classifier.classify(&path).unwrap(), prediction);
    }

    #[test]
    fn test_missing_image_is_error() {
        let inferencer = untrained(2);
        assert!(inferencer.predict(Path::new("/no/such/leaf.jpg")).is_err());
    }

    #[test]
    fn test_load_without_artifact_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let res = Inferencer::<TestBackend>::load(&tmp.path().join("none"), Default::default());
        assert!(res.is_err());
    }
}
