// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported, normally run in this order:
//   1. `split` — copies the raw dataset into train / val / test
//   2. `train` — fits the classifier and saves the artifact
//   3. `test`  — predicts every image in the test split
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use commands::{Commands, SplitArgs, TestArgs, TrainArgs};
use crate::application::config::PipelineConfig;
use crate::infra::file_store::LocalFileStore;

#[derive(Parser, Debug)]
#[command(
    name = "pest-classifier",
    version = "0.1.0",
    about = "Split a pest image dataset, train a CNN on it, then classify the test images."
)]
pub struct Cli {
    /// JSON file with pipeline settings; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run (split, train or test)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Build the config, then dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        let mut cfg = PipelineConfig::load_or_default(self.config.as_deref())?;

        match self.command {
            Commands::Split(args) => run_split(args, &mut cfg),
            Commands::Train(args) => run_train(args, &mut cfg),
            Commands::Test(args)  => run_test(args, &mut cfg),
        }
    }
}

fn run_split(args: SplitArgs, cfg: &mut PipelineConfig) -> Result<()> {
    use crate::application::split_use_case::SplitUseCase;

    args.apply(cfg);
    let store  = LocalFileStore::new();
    let report = SplitUseCase::new(cfg, &store).execute()?;

    println!();
    for class in &report.classes {
        println!(
            "{:<20} train={:<5} val={:<5} test={:<5}",
            class.class_name, class.train, class.val, class.test
        );
    }
    println!("{} files copied.", report.files_copied());
    println!("Image distribution complete!");
    Ok(())
}

fn run_train(args: TrainArgs, cfg: &mut PipelineConfig) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    args.apply(cfg);
    tracing::info!("Starting training on images in: {}", cfg.train_path.display());

    let store  = LocalFileStore::new();
    let report = TrainUseCase::new(cfg, &store).execute()?;

    println!(
        "\nTrained on {} images ({} classes) in {} optimizer steps, validated on {}.",
        report.train_samples, report.num_classes, report.optimizer_steps, report.val_samples
    );
    if let Some(last) = report.final_metrics() {
        println!("Final: {}", last.summary_line(report.epochs));
    }
    println!("Model saved to {}", cfg.model_save_path.display());
    Ok(())
}

fn run_test(args: TestArgs, cfg: &mut PipelineConfig) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    args.apply(cfg);
    let store   = LocalFileStore::new();
    let results = EvaluateUseCase::new(cfg, &store).execute()?;

    println!("\nClassified {} images.", results.len());
    Ok(())
}
