// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
//   - Training runs on an Autodiff backend for gradients
//   - model.valid() returns the model on the inner backend, used
//     for the validation pass (no autodiff overhead)
//   - The training loader reshuffles on every epoch
//   - Validation is monitoring only: no early stopping and no
//     best-epoch selection; the weights after the last epoch win
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::config::PipelineConfig;
use crate::data::{batcher::ImageBatcher, dataset::ImageDataset};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{PestCnn, PestCnnConfig};

/// What a finished fit looked like
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub num_classes:     usize,
    pub epochs:          usize,
    /// Adam updates applied, one per training batch
    pub optimizer_steps: usize,
    pub train_samples:   usize,
    pub val_samples:     usize,
    pub history:         Vec<EpochMetrics>,
}

impl TrainingReport {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

/// Fit a fresh model on `train_dataset`, monitoring `val_dataset`.
/// Returns the trained model on the inner (non-autodiff) backend.
pub fn run_training<B: AutodiffBackend>(
    cfg:           &PipelineConfig,
    model_cfg:     &PestCnnConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    metrics:       Option<&MetricsLogger>,
    device:        B::Device,
) -> Result<(PestCnn<B::InnerBackend>, TrainingReport)> {
    let image_size    = model_cfg.image_size;
    let train_samples = train_dataset.sample_count();
    let val_samples   = val_dataset.sample_count();

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: PestCnn<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: conv {}×{}×{} → dense {} → {} classes",
        model_cfg.filters, model_cfg.kernel_size, model_cfg.kernel_size,
        model_cfg.hidden, model_cfg.num_classes,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let shuffle_seed  = cfg.seed.unwrap_or_else(rand::random);
    let train_batcher = ImageBatcher::<B>::new(device.clone(), image_size);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(shuffle_seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = ImageBatcher::<B::InnerBackend>::new(device.clone(), image_size);
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut history = Vec::with_capacity(cfg.epochs);
    let mut optimizer_steps = 0usize;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_correct  = 0usize;
        let mut train_seen     = 0usize;

        for batch in train_loader.iter() {
            let batch_len = batch.targets.dims()[0];
            let (loss, logits) = model.forward_loss(batch.images, batch.targets.clone());

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val * batch_len as f64;
            train_correct  += count_correct(logits, batch.targets);
            train_seen     += batch_len;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
            optimizer_steps += 1;
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_correct  = 0usize;
        let mut val_seen     = 0usize;

        for batch in val_loader.iter() {
            let batch_len = batch.targets.dims()[0];
            let (loss, logits) = model_valid.forward_loss(batch.images, batch.targets.clone());

            val_loss_sum += loss.into_scalar().elem::<f64>() * batch_len as f64;
            val_correct  += count_correct(logits, batch.targets);
            val_seen     += batch_len;
        }

        let m = EpochMetrics::new(
            epoch,
            mean(train_loss_sum, train_seen),
            ratio(train_correct, train_seen),
            mean(val_loss_sum, val_seen),
            ratio(val_correct, val_seen),
        );
        println!("{}", m.summary_line(cfg.epochs));
        if let Some(logger) = metrics {
            logger.log(&m)?;
        }
        history.push(m);
    }

    tracing::info!("Training complete!");

    let report = TrainingReport {
        num_classes: model_cfg.num_classes,
        epochs:      cfg.epochs,
        optimizer_steps,
        train_samples,
        val_samples,
        history,
    };
    Ok((model.valid(), report))
}

/// Number of rows whose highest logit is the target class
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns [batch, 1] — flatten to [batch] before comparing
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

fn mean(sum: f64, n: usize) -> f64 {
    if n > 0 { sum / n as f64 } else { f64::NAN }
}

fn ratio(correct: usize, n: usize) -> f64 {
    if n > 0 { correct as f64 / n as f64 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::ImageSample;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    /// Solid red images for class 0, solid blue for class 1
    fn separable(per_class: usize, side: usize) -> ImageDataset {
        let mut samples = Vec::new();
        for label in 0..2 {
            let rgb = if label == 0 { [1.0, 0.0, 0.0] } else { [0.0, 0.0, 1.0] };
            for _ in 0..per_class {
                let pixels = (0..side * side).flat_map(|_| rgb).collect();
                samples.push(ImageSample { pixels, label });
            }
        }
        ImageDataset::from_samples(samples)
    }

    fn small_config(epochs: usize, batch_size: usize) -> PipelineConfig {
        PipelineConfig {
            epochs,
            batch_size,
            image_size: 8,
            seed: Some(3),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_two_classes_give_output_width_two() {
        let cfg       = small_config(5, 16);
        let model_cfg = PestCnnConfig::new(2).with_image_size(8);
        let (model, report) = run_training::<TestBackend>(
            &cfg, &model_cfg, separable(8, 8), separable(1, 8), None, Default::default(),
        ).unwrap();

        assert_eq!(model.num_classes(), 2);
        assert_eq!(report.num_classes, 2);
        assert_eq!(report.epochs, 5);
        assert_eq!(report.history.len(), 5);
        assert_eq!(report.train_samples, 16);
        // 16 samples in batches of 16: one update per epoch
        assert_eq!(report.optimizer_steps, 5);
    }

    #[test]
    fn test_partial_last_batch_still_steps() {
        let cfg       = small_config(3, 6);
        let model_cfg = PestCnnConfig::new(2).with_image_size(8);
        let (_, report) = run_training::<TestBackend>(
            &cfg, &model_cfg, separable(8, 8), separable(1, 8), None, Default::default(),
        ).unwrap();

        // 16 samples in batches of 6, 6 and 4
        assert_eq!(report.optimizer_steps, 3 * 3);
    }

    #[test]
    fn test_learns_separable_colours() {
        let cfg       = PipelineConfig { learning_rate: 1e-2, ..small_config(20, 4) };
        let model_cfg = PestCnnConfig::new(2).with_image_size(8);
        let (_, report) = run_training::<TestBackend>(
            &cfg, &model_cfg, separable(8, 8), separable(2, 8), None, Default::default(),
        ).unwrap();

        let last = report.final_metrics().unwrap();
        assert_eq!(last.val_acc, 1.0, "{last:?}");
    }

    #[test]
    fn test_empty_validation_split_reports_nan_loss() {
        let cfg       = small_config(1, 16);
        let model_cfg = PestCnnConfig::new(2).with_image_size(8);
        let (_, report) = run_training::<TestBackend>(
            &cfg, &model_cfg, separable(2, 8), ImageDataset::from_samples(Vec::new()),
            None, Default::default(),
        ).unwrap();
        assert!(report.history[0].val_loss.is_nan());
        assert_eq!(report.val_samples, 0);
    }

    #[test]
    fn test_count_correct() {
        let device = Default::default();
        let logits = Tensor::<NdArray, 2>::from_floats([[2.0, 0.1], [0.3, 0.9], [5.0, 1.0]], &device);
        let targets = Tensor::<NdArray, 1, Int>::from_ints([0, 1, 1], &device);
        assert_eq!(count_correct(logits, targets), 2);
    }
}
