// ============================================================
// Layer 2 — SplitUseCase
// ============================================================
// Distributes a raw dataset into train / val / test folders:
//
//   <dataset_path>/<class>/train/<images>
//        ↓
//   <data_path>/train/<class>/<images>
//   <data_path>/val/<class>/<images>
//   <data_path>/test/<class>/<images>
//
//   Step 1: Validate the ratios                 (Layer 3 - domain)
//   Step 2: List the class folders              (Layer 6 - infra)
//   Step 3: Create the subset folders per class (Layer 6 - infra)
//   Step 4: Shuffle and split each class        (Layer 4 - data)
//   Step 5: Copy every file into its subset     (Layer 6 - infra)
//
// Files are copied, never moved; the source tree is untouched.
// Copies run one after another and nothing is rolled back if a
// copy fails part way.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::path::{Path, PathBuf};

use crate::application::config::PipelineConfig;
use crate::data::{loader::list_images, splitter::split_three_way};
use crate::domain::error::PipelineError;
use crate::domain::image_record::ImageRecord;
use crate::domain::traits::{EntryKind, FileStore};

/// Sizes of the three subsets produced for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSplit {
    pub class_name: String,
    pub train:      usize,
    pub val:        usize,
    pub test:       usize,
}

impl ClassSplit {
    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

/// What a finished split run did, class by class
#[derive(Debug, Clone, Default)]
pub struct SplitReport {
    pub classes: Vec<ClassSplit>,
}

impl SplitReport {
    pub fn files_copied(&self) -> usize {
        self.classes.iter().map(ClassSplit::total).sum()
    }
}

pub struct SplitUseCase<'a> {
    config: &'a PipelineConfig,
    store:  &'a dyn FileStore,
}

impl<'a> SplitUseCase<'a> {
    pub fn new(config: &'a PipelineConfig, store: &'a dyn FileStore) -> Self {
        Self { config, store }
    }

    pub fn execute(&self) -> Result<SplitReport> {
        let cfg = self.config;

        // ── Step 1: Ratios ────────────────────────────────────────────────────
        cfg.split_ratios.validate()?;

        // One RNG for the whole run: a fixed seed fixes every class's shuffle
        let mut rng: Box<dyn RngCore> = match cfg.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None       => Box::new(rand::thread_rng()),
        };

        // ── Step 2: Class folders ─────────────────────────────────────────────
        let classes = self.class_folders(&cfg.dataset_path)?;
        tracing::info!(
            "Splitting {} classes from '{}' into '{}'",
            classes.len(),
            cfg.dataset_path.display(),
            cfg.data_path.display()
        );

        let mut report = SplitReport::default();

        for (class_name, class_dir) in classes {
            let source = class_dir.join("train");
            if !self.store.exists(&source) {
                return Err(PipelineError::MissingPath(source).into());
            }

            // ── Step 3: Subset folders (created even when a subset is empty) ──
            for subset in ["train", "val", "test"] {
                self.store.ensure_dir(&self.target_dir(subset, &class_name))?;
            }

            // ── Step 4: Shuffle and split ─────────────────────────────────────
            let images = list_images(self.store, &source, &class_name)?;
            let split  = split_three_way(images, &cfg.split_ratios, rng.as_mut());

            // ── Step 5: Copy ──────────────────────────────────────────────────
            for (subset, records) in split.subsets() {
                let target_dir = self.target_dir(subset, &class_name);
                for record in records {
                    self.copy_into(record, &target_dir)?;
                }
            }

            tracing::info!(
                "Class '{}': {} train, {} val, {} test",
                class_name,
                split.train.len(),
                split.val.len(),
                split.test.len()
            );
            report.classes.push(ClassSplit {
                class_name,
                train: split.train.len(),
                val:   split.val.len(),
                test:  split.test.len(),
            });
        }

        Ok(report)
    }

    /// Subdirectories of the dataset root; anything else is skipped with a warning
    fn class_folders(&self, root: &Path) -> Result<Vec<(String, PathBuf)>> {
        let entries = self
            .store
            .list_dir(root)
            .with_context(|| format!("Cannot read dataset folder '{}'", root.display()))?;

        let mut classes = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Dir if !entry.name.starts_with('.') => {
                    classes.push((entry.name, entry.path))
                }
                _ => tracing::warn!("Skipping '{}': not a class folder", entry.path.display()),
            }
        }
        Ok(classes)
    }

    fn target_dir(&self, subset: &str, class_name: &str) -> PathBuf {
        self.config.data_path.join(subset).join(class_name)
    }

    fn copy_into(&self, record: &ImageRecord, target_dir: &Path) -> Result<()> {
        let file_name = record
            .file_name()
            .with_context(|| format!("'{}' has no file name", record.path().display()))?;
        let target = target_dir.join(file_name);

        self.store.copy_file(record.path(), &target)?;
        println!("Copied {} to {}", file_name.to_string_lossy(), target.display());
        Ok(())
    }
}
