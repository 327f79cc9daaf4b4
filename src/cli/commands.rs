// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `split`, `train` and `test`
// and all their configurable flags.
//
// Every flag is optional. A flag that is given overrides the
// same key from --config, which in turn overrides the default.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::config::PipelineConfig;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy <dataset>/<class>/train images into data/{train,val,test}/<class>
    Split(SplitArgs),

    /// Train the classifier on data/train, monitoring data/val
    Train(TrainArgs),

    /// Predict the class of every image in data/test
    Test(TestArgs),
}

/// Arguments for the `split` command
#[derive(Args, Debug, Default)]
pub struct SplitArgs {
    /// Source dataset laid out as <class>/train/<images>
    #[arg(long)]
    pub dataset_path: Option<PathBuf>,

    /// Destination for the train / val / test folders
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// Share of each class copied to train
    #[arg(long)]
    pub train_ratio: Option<f64>,

    /// Share of each class copied to val (the remainder goes to test)
    #[arg(long)]
    pub val_ratio: Option<f64>,

    /// Fix the shuffle so the split can be reproduced
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SplitArgs {
    pub fn apply(self, cfg: &mut PipelineConfig) {
        if let Some(p) = self.dataset_path { cfg.dataset_path = p; }
        if let Some(p) = self.data_path    { cfg.data_path    = p; }
        if let Some(r) = self.train_ratio  { cfg.split_ratios.train = r; }
        if let Some(r) = self.val_ratio    { cfg.split_ratios.val   = r; }
        if self.train_ratio.is_some() || self.val_ratio.is_some() {
            cfg.split_ratios.test = (1.0 - cfg.split_ratios.train - cfg.split_ratios.val).max(0.0);
        }
        if self.seed.is_some() { cfg.seed = self.seed; }
    }
}

/// Arguments for the `train` command
#[derive(Args, Debug, Default)]
pub struct TrainArgs {
    /// Folder of class subfolders to fit on
    #[arg(long)]
    pub train_path: Option<PathBuf>,

    /// Folder of class subfolders to validate on after every epoch
    #[arg(long)]
    pub val_path: Option<PathBuf>,

    /// Where the model artifact is written
    #[arg(long)]
    pub model_save_path: Option<PathBuf>,

    /// Number of images processed together in one step
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Number of full passes through the training data
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Adam step size
    #[arg(long)]
    pub lr: Option<f64>,

    /// Side length images are resized to
    #[arg(long)]
    pub image_size: Option<usize>,

    /// Fix the per-epoch shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Train on the CPU backend when no GPU adapter is found
    #[arg(long)]
    pub allow_cpu: bool,
}

impl TrainArgs {
    pub fn apply(self, cfg: &mut PipelineConfig) {
        if let Some(p) = self.train_path      { cfg.train_path      = p; }
        if let Some(p) = self.val_path        { cfg.val_path        = p; }
        if let Some(p) = self.model_save_path { cfg.model_save_path = p; }
        if let Some(n) = self.batch_size      { cfg.batch_size      = n; }
        if let Some(n) = self.epochs          { cfg.epochs          = n; }
        if let Some(lr) = self.lr             { cfg.learning_rate   = lr; }
        if let Some(n) = self.image_size      { cfg.image_size      = n; }
        if self.seed.is_some() { cfg.seed = self.seed; }
        if self.allow_cpu      { cfg.require_gpu = false; }
    }
}

/// Arguments for the `test` command
#[derive(Args, Debug, Default)]
pub struct TestArgs {
    /// Folder of class subfolders to predict
    #[arg(long)]
    pub test_path: Option<PathBuf>,

    /// Folder the model artifact was saved to by `train`
    #[arg(long)]
    pub model_save_path: Option<PathBuf>,
}

impl TestArgs {
    pub fn apply(self, cfg: &mut PipelineConfig) {
        if let Some(p) = self.test_path       { cfg.test_path       = p; }
        if let Some(p) = self.model_save_path { cfg.model_save_path = p; }
    }
}
