// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate the config          (Layer 2 - application)
//   Step 2: Pick the compute backend     (Layer 6 - infra)
//   Step 3: Scan train and val folders   (Layer 4 - data)
//   Step 4: Decode both splits           (Layer 4 - data)
//   Step 5: Size the model               (Layer 5 - ml)
//   Step 6: Run the training loop        (Layer 5 - ml)
//   Step 7: Save the model artifact      (Layer 6 - infra)
//
// The backend check comes before anything touches the dataset,
// so a machine without a GPU fails fast.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use burn::tensor::backend::AutodiffBackend;

use crate::application::config::PipelineConfig;
use crate::data::{dataset::ImageDataset, loader::ImageFolder, preprocessor::Preprocessor};
use crate::domain::class_map::ClassMap;
use crate::domain::error::PipelineError;
use crate::domain::traits::FileStore;
use crate::infra::{
    backend::{
        find_accelerator, select_training_device, AdapterLookup, ComputeDevice,
        CpuTrainingBackend, GpuTrainingBackend,
    },
    checkpoint::ModelStore,
    metrics::MetricsLogger,
};
use crate::ml::{
    model::PestCnnConfig,
    trainer::{run_training, TrainingReport},
};

pub struct TrainUseCase<'a> {
    config:       &'a PipelineConfig,
    store:        &'a dyn FileStore,
    find_adapter: AdapterLookup,
}

impl<'a> TrainUseCase<'a> {
    pub fn new(config: &'a PipelineConfig, store: &'a dyn FileStore) -> Self {
        Self { config, store, find_adapter: find_accelerator }
    }

    #[cfg(test)]
    fn with_adapter_lookup(mut self, find_adapter: AdapterLookup) -> Self {
        self.find_adapter = find_adapter;
        self
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = self.config;

        // ── Step 1: Config ────────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Backend ───────────────────────────────────────────────────
        let device = match select_training_device(cfg.require_gpu, self.find_adapter) {
            Ok(device) => device,
            Err(e) => {
                tracing::error!("GPU backend not available. Exiting...");
                return Err(e.into());
            }
        };
        tracing::info!("Training on {}", device.name());

        // ── Step 3: Scan ──────────────────────────────────────────────────────
        // The val split reuses the train class map so labels line up
        let train_folder = ImageFolder::scan(self.store, &cfg.train_path)?;
        if train_folder.is_empty() {
            return Err(PipelineError::EmptyDataset(cfg.train_path.clone()).into());
        }
        let val_folder = ImageFolder::scan_with(self.store, &cfg.val_path, &train_folder.classes)?;

        // ── Step 4: Decode ────────────────────────────────────────────────────
        let preprocessor  = Preprocessor::new(cfg.image_size);
        let train_dataset = ImageDataset::load(&train_folder, &preprocessor)?;
        let val_dataset   = ImageDataset::load(&val_folder, &preprocessor)?;
        tracing::info!(
            "Decoded {} training and {} validation images",
            train_dataset.sample_count(),
            val_dataset.sample_count()
        );

        let mut per_class = vec![0usize; train_folder.classes.len()];
        for label in train_dataset.labels() {
            per_class[label] += 1;
        }
        for (name, count) in train_folder.classes.names().iter().zip(&per_class) {
            if *count == 0 {
                tracing::warn!("Class '{}' has no training images", name);
            }
        }

        // ── Step 5: Model size ────────────────────────────────────────────────
        let classes   = train_folder.classes;
        let model_cfg = PestCnnConfig::new(classes.len()).with_image_size(cfg.image_size);

        // ── Step 6 + 7: Train, then save ──────────────────────────────────────
        let metrics = MetricsLogger::create(&cfg.model_save_path)?;
        let model_store = ModelStore::new(&cfg.model_save_path);

        match device {
            ComputeDevice::Gpu(d) => fit_and_save::<GpuTrainingBackend>(
                cfg, &model_cfg, &classes, train_dataset, val_dataset, &metrics, &model_store, d,
            ),
            ComputeDevice::Cpu(d) => fit_and_save::<CpuTrainingBackend>(
                cfg, &model_cfg, &classes, train_dataset, val_dataset, &metrics, &model_store, d,
            ),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fit_and_save<B: AutodiffBackend>(
    cfg:         &PipelineConfig,
    model_cfg:   &PestCnnConfig,
    classes:     &ClassMap,
    train:       ImageDataset,
    val:         ImageDataset,
    metrics:     &MetricsLogger,
    model_store: &ModelStore,
    device:      B::Device,
) -> Result<TrainingReport> {
    let (model, report) = run_training::<B>(cfg, model_cfg, train, val, Some(metrics), device)?;
    model_store.save(&model, model_cfg, classes)?;
    tracing::info!("Model saved to '{}'", model_store.dir().display());
    let csv = metrics.commit()?;
    tracing::info!("Epoch metrics written to '{}'", csv.display());
    Ok(report)
}
