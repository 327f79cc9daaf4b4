// ============================================================
// Layer 2 — Pipeline Configuration
// ============================================================
// Every path, ratio and hyperparameter the three subcommands
// use, gathered in one struct that is passed into each entry
// point instead of living in process-wide constants.
//
// Sources, lowest to highest precedence:
//   1. Default::default()
//   2. a JSON file given with --config (missing keys keep defaults)
//   3. individual command-line flags
//
// Keys are snake_case; the camelCase spellings (batchSize,
// modelSavePath, ...) are accepted as aliases. An unrecognised
// key is rejected rather than ignored.
//
// Example file:
//   {
//     "dataset_path": "/mnt/pests/datasets",
//     "split_ratios": { "train": 0.7, "val": 0.15, "test": 0.15 },
//     "epochs": 10
//   }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::data::preprocessor::DEFAULT_IMAGE_SIZE;
use crate::domain::error::PipelineError;
use crate::domain::split::SplitRatios;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Source dataset: <dataset_path>/<class>/train/<images>
    #[serde(alias = "datasetPath")]
    pub dataset_path:    PathBuf,
    /// Destination of the splitter: <data_path>/{train,val,test}/<class>
    #[serde(alias = "dataPath")]
    pub data_path:       PathBuf,
    #[serde(alias = "splitRatios")]
    pub split_ratios:    SplitRatios,
    #[serde(alias = "trainPath")]
    pub train_path:      PathBuf,
    #[serde(alias = "valPath")]
    pub val_path:        PathBuf,
    #[serde(alias = "testPath")]
    pub test_path:       PathBuf,
    /// Directory holding the model artifact
    #[serde(alias = "modelSavePath")]
    pub model_save_path: PathBuf,
    #[serde(alias = "batchSize")]
    pub batch_size:      usize,
    pub epochs:          usize,
    #[serde(alias = "learningRate")]
    pub learning_rate:   f64,
    /// Side length images are resized to
    #[serde(alias = "imageSize")]
    pub image_size:      usize,
    /// Fixes the split shuffle and the training shuffle when set
    pub seed:            Option<u64>,
    /// Refuse to train without an accelerated backend
    #[serde(alias = "requireGpu")]
    pub require_gpu:     bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path:    PathBuf::from("datasets"),
            data_path:       PathBuf::from("data"),
            split_ratios:    SplitRatios::default(),
            train_path:      PathBuf::from("data/train"),
            val_path:        PathBuf::from("data/val"),
            test_path:       PathBuf::from("data/test"),
            model_save_path: PathBuf::from("models/pest-classifier"),
            batch_size:      16,
            epochs:          5,
            learning_rate:   1e-3,
            image_size:      DEFAULT_IMAGE_SIZE,
            seed:            None,
            require_gpu:     true,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file; keys it omits keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::MissingPath(path.to_path_buf()).into());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&json).map_err(|e| {
            PipelineError::InvalidConfig(format!("'{}': {e}", path.display()))
        })?;
        tracing::debug!("Loaded config from '{}'", path.display());
        Ok(cfg)
    }

    /// Defaults, or the given file when there is one
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None    => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.split_ratios.validate()?;
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.epochs == 0 {
            return Err(PipelineError::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.image_size < 4 {
            return Err(PipelineError::InvalidConfig(format!(
                "image_size must be at least 4, got {}",
                self.image_size
            )));
        }
        if !(self.learning_rate > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
