// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Runs the trained classifier over every image in the test split:
//
//   Step 1: Pick the compute backend   (Layer 6 - infra)
//   Step 2: Load the model artifact    (Layer 5 - ml)
//   Step 3: Walk test/<class>/<image>  (Layer 4 - data)
//   Step 4: Predict and print          (Layer 5 - ml)
//
// The model is loaded once and reused for every image. Each
// prediction is printed as it is made; no accuracy is computed.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::config::PipelineConfig;
use crate::data::loader::list_images;
use crate::domain::prediction::Prediction;
use crate::domain::traits::{EntryKind, FileStore, ImageClassifier};
use crate::infra::backend::{select_inference_device, ComputeDevice, CpuBackend, GpuBackend};
use crate::ml::inferencer::Inferencer;

pub struct EvaluateUseCase<'a> {
    config: &'a PipelineConfig,
    store:  &'a dyn FileStore,
}

impl<'a> EvaluateUseCase<'a> {
    pub fn new(config: &'a PipelineConfig, store: &'a dyn FileStore) -> Self {
        Self { config, store }
    }

    /// Predict every test image, in folder listing order
    pub fn execute(&self) -> Result<Vec<(PathBuf, Prediction)>> {
        // ── Step 1: Backend ───────────────────────────────────────────────────
        let device = select_inference_device();
        if !device.is_accelerated() {
            tracing::warn!("No GPU adapter found, evaluating on the CPU backend");
        }
        tracing::info!("Evaluating on {}", device.name());

        // ── Step 2: Load ──────────────────────────────────────────────────────
        match device {
            ComputeDevice::Gpu(d) => {
                self.run(&Inferencer::<GpuBackend>::load(&self.config.model_save_path, d)?)
            }
            ComputeDevice::Cpu(d) => {
                self.run(&Inferencer::<CpuBackend>::load(&self.config.model_save_path, d)?)
            }
        }
    }

    /// Walk the test split with any classifier
    pub fn run(&self, classifier: &dyn ImageClassifier) -> Result<Vec<(PathBuf, Prediction)>> {
        let test_path = &self.config.test_path;
        let entries = self
            .store
            .list_dir(test_path)
            .with_context(|| format!("Cannot read test folder '{}'", test_path.display()))?;

        let mut results = Vec::new();

        // ── Step 3 + 4: Walk and predict ──────────────────────────────────────
        for entry in entries {
            if entry.kind != EntryKind::Dir || entry.name.starts_with('.') {
                continue;
            }
            for record in list_images(self.store, &entry.path, &entry.name)? {
                println!("Testing {}...", record.path().display());
                let prediction = classifier.classify(record.path())?;
                println!(
                    "Predicted category index: {} ({})",
                    prediction.index, prediction.class_name
                );
                results.push((record.path, prediction));
            }
        }

        tracing::info!("Evaluated {} images", results.len());
        Ok(results)
    }
}
