// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores the trained classifier using Burn's
// CompactRecorder.
//
// Files written to the model directory:
//   1. model.mpk          — all learned parameters
//   2. model_config.json  — layer sizes, needed to rebuild the model
//                           before the weights can be loaded into it
//   3. classes.json       — class name for every output index
//
//   models/pest-classifier/
//     model.mpk
//     model_config.json
//     classes.json
//     metrics.csv          ← written by the MetricsLogger
//
// There is no versioning: each training run overwrites all three
// files. Loading fails if the stored weights do not match the
// architecture described by model_config.json.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::class_map::ClassMap;
use crate::domain::error::PipelineError;
use crate::ml::model::{PestCnn, PestCnnConfig};

const WEIGHTS_FILE: &str = "model";
const CONFIG_FILE:  &str = "model_config.json";
const CLASSES_FILE: &str = "classes.json";

/// Everything the evaluator needs to rebuild a trained model
pub struct LoadedModel<B: Backend> {
    pub model:   PestCnn<B>,
    pub config:  PestCnnConfig,
    pub classes: ClassMap,
}

/// Reads and writes the model artifact in one directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write weights, model config and class map, replacing any previous artifact.
    pub fn save<B: Backend>(
        &self,
        model:   &PestCnn<B>,
        config:  &PestCnnConfig,
        classes: &ClassMap,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // The recorder appends its own file extension
        let path = self.dir.join(WEIGHTS_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save model to '{}'", path.display())
            })?;

        self.write_json(CONFIG_FILE, config)?;
        self.write_json(CLASSES_FILE, classes)?;

        tracing::debug!("Saved model artifact to '{}'", self.dir.display());
        Ok(())
    }

    /// Rebuild the model described by model_config.json and load its weights.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<LoadedModel<B>> {
        if !self.dir.is_dir() {
            return Err(PipelineError::MissingPath(self.dir.clone()))
                .context("Have you run 'train' first?");
        }

        let config: PestCnnConfig = self.read_json(CONFIG_FILE)?;
        let classes: ClassMap     = self.read_json(CLASSES_FILE)?;
        if classes.is_empty() || classes.len() != config.num_classes {
            return Err(PipelineError::InvalidConfig(format!(
                "'{}' lists {} classes but the model has {} outputs",
                self.dir.join(CLASSES_FILE).display(),
                classes.len(),
                config.num_classes
            ))
            .into());
        }

        let path   = self.dir.join(WEIGHTS_FILE);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load model weights from '{}'", path.display())
            })?;
        let model = config.init::<B>(device).load_record(record);

        tracing::info!(
            "Loaded model from '{}' ({} classes)",
            self.dir.display(),
            classes.len()
        );
        Ok(LoadedModel { model, config, classes })
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        if !path.is_file() {
            return Err(PipelineError::MissingPath(path).into());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_save_then_load_restores_predictions() {
        let tmp     = tempfile::tempdir().unwrap();
        let device  = Default::default();
        let config  = PestCnnConfig::new(2).with_image_size(6);
        let classes: ClassMap = ["aphids", "slug"].into_iter().collect();
        let model: PestCnn<TestBackend> = config.init(&device);

        let store = ModelStore::new(tmp.path().join("pest-classifier"));
        store.save(&model, &config, &classes).unwrap();

        let loaded = store.load::<TestBackend>(&device).unwrap();
        assert_eq!(loaded.classes, classes);
        assert_eq!(loaded.config.image_size, 6);

        let input  = Tensor::<TestBackend, 4>::ones([1, 6, 6, 3], &device);
        let before: Vec<f32> = model.forward(input.clone()).into_data().to_vec().unwrap();
        let after:  Vec<f32> = loaded.model.forward(input).into_data().to_vec().unwrap();
        // CompactRecorder stores half precision
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).abs() < 1e-2, "{a} vs {b}");
        }
    }

    #[test]
    fn test_class_map_must_match_output_width() {
        let tmp     = tempfile::tempdir().unwrap();
        let device  = Default::default();
        let config  = PestCnnConfig::new(2).with_image_size(6);
        let model: PestCnn<TestBackend> = config.init(&device);
        let store   = ModelStore::new(tmp.path());

        let three: ClassMap = ["aphids", "slug", "snail"].into_iter().collect();
        store.save(&model, &config, &three).unwrap();
        let err = store.load::<TestBackend>(&device).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidConfig(_))
        ));

        store.save(&model, &config, &ClassMap::new()).unwrap();
        assert!(store.load::<TestBackend>(&device).is_err());
    }

    #[test]
    fn test_load_without_training_is_missing_path() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ModelStore::new(tmp.path().join("absent"))
            .load::<TestBackend>(&Default::default())
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingPath(_))
        ));
    }
}
