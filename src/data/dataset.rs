use anyhow::{Context, Result};
use burn::data::dataset::Dataset;

use crate::data::loader::ImageFolder;
use crate::data::preprocessor::Preprocessor;

/// One decoded, normalised image and its class label.
/// `pixels` is channel-last [H, W, 3] without the batch dimension.
#[derive(Debug, Clone)]
pub struct ImageSample {
    pub pixels: Vec<f32>,
    pub label:  usize,
}

/// A whole split held in memory, decoded up front so a corrupt
/// image stops the run before any training happens.
pub struct ImageDataset {
    samples: Vec<ImageSample>,
}

impl ImageDataset {
    pub fn load(folder: &ImageFolder, preprocessor: &Preprocessor) -> Result<Self> {
        let mut samples = Vec::with_capacity(folder.len());

        for (record, label) in folder.labelled() {
            let tensor = preprocessor
                .load(record.path())
                .with_context(|| format!("Loading '{}'", folder.root.display()))?;
            samples.push(ImageSample { pixels: tensor.into_data(), label });

            if samples.len() % 500 == 0 {
                tracing::info!("Decoded {}/{} images", samples.len(), folder.len());
            }
        }

        Ok(Self { samples })
    }

    #[cfg(test)]
    pub fn from_samples(samples: Vec<ImageSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn labels(&self) -> impl Iterator<Item = usize> + '_ {
        self.samples.iter().map(|s| s.label)
    }
}

impl Dataset<ImageSample> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::file_store::LocalFileStore;
    use image::{Rgb, RgbImage};
    use std::fs;

    #[test]
    fn test_load_decodes_every_image() {
        let tmp = tempfile::tempdir().unwrap();
        for (class, shade) in [("aphids", 10u8), ("snail", 240u8)] {
            fs::create_dir_all(tmp.path().join(class)).unwrap();
            for i in 0..3 {
                RgbImage::from_pixel(6, 6, Rgb([shade, shade, shade]))
                    .save(tmp.path().join(class).join(format!("{i}.png")))
                    .unwrap();
            }
        }

        let folder  = ImageFolder::scan(&LocalFileStore::new(), tmp.path()).unwrap();
        let dataset = ImageDataset::load(&folder, &Preprocessor::new(4)).unwrap();
        assert_eq!(dataset.len(), 6);
        let item = dataset.get(0).unwrap();
        assert_eq!(item.pixels.len(), 4 * 4 * 3);
        assert!(dataset.get(6).is_none());

        let labels: std::collections::BTreeSet<usize> = dataset.labels().collect();
        assert_eq!(labels, [0, 1].into_iter().collect());
    }

    #[test]
    fn test_one_corrupt_image_fails_the_load() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("slug")).unwrap();
        RgbImage::new(4, 4).save(tmp.path().join("slug/good.png")).unwrap();
        fs::write(tmp.path().join("slug/bad.png"), b"garbage").unwrap();

        let folder = ImageFolder::scan(&LocalFileStore::new(), tmp.path()).unwrap();
        assert!(ImageDataset::load(&folder, &Preprocessor::new(4)).is_err());
    }
}
