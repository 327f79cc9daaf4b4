// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average cross-entropy loss over training batches
//   - train_acc:  fraction of training images classified correctly
//   - val_loss:   average cross-entropy loss on the validation set
//   - val_acc:    fraction of validation images classified correctly
//
// Output file: <model_save_path>/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,train_acc,val_loss,val_acc
//   1,1.912300,0.241000,1.850100,0.270000
//   2,1.604500,0.388000,1.702300,0.315000
//
// The file belongs to the model artifact, so it is rewritten
// from scratch by every training run. Rows go to
// metrics.csv.partial while the run is in progress; commit()
// moves that file over metrics.csv once the model is saved, so a
// failed run never wipes the log of the artifact still on disk.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Range: [0.0, 1.0]
    pub train_acc: f64,

    /// NaN when the validation split is empty
    pub val_loss: f64,

    /// Range: [0.0, 1.0]
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        train_acc:  f64,
        val_loss:   f64,
        val_acc:    f64,
    ) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc }
    }

    /// The human-readable progress line printed after each epoch
    pub fn summary_line(&self, total_epochs: usize) -> String {
        format!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.1}% | val_loss={:.4} | val_acc={:.1}%",
            self.epoch, total_epochs,
            self.train_loss, self.train_acc * 100.0,
            self.val_loss,   self.val_acc   * 100.0,
        )
    }
}

const CSV_FILE:     &str = "metrics.csv";
const PARTIAL_FILE: &str = "metrics.csv.partial";

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    dir:      PathBuf,
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh in-progress log in `dir`, discarding any unfinished one.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join(PARTIAL_FILE);
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,train_acc,val_loss,val_acc")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { dir: dir.to_path_buf(), csv_path })
    }

    /// Replace metrics.csv with this run's log and return its path
    pub fn commit(&self) -> Result<PathBuf> {
        let target = self.dir.join(CSV_FILE);
        fs::rename(&self.csv_path, &target).with_context(|| {
            format!("Cannot move '{}' to '{}'", self.csv_path.display(), target.display())
        })?;
        Ok(target)
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.train_acc,
            m.val_loss,
            m.val_acc,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    /// The in-progress log
    #[cfg(test)]
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
