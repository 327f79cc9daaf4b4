// ============================================================
// Layer 4 — Image Preprocessor
// ============================================================
// Turns an image file into the fixed-size numeric input the
// classifier expects. Shared by the trainer and the evaluator.
//
// Steps (applied in order):
//   1. Read the file bytes
//   2. Decode (format guessed from the content, not the extension)
//   3. Resize to image_size × image_size, bilinear
//   4. Convert to 8-bit RGB (drops alpha, expands grayscale)
//   5. Convert to f32 and scale by 1/255 → values in [0, 1]
//   6. Prepend a batch dimension of 1
//
// Output layout is channel-last: [1, height, width, 3].
// Nothing is cached and nothing is retried; a decode failure is
// returned as PipelineError::Decode and ends the run.
//
// Reference: image crate documentation (imageops::resize)

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage};
use std::{fs, path::Path};

use crate::domain::error::PipelineError;

/// Side length the classifier is trained on
pub const DEFAULT_IMAGE_SIZE: usize = 224;

/// A single preprocessed image: shape [1, H, W, 3], row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PixelTensor {
    pub shape: [usize; 4],
    pub data:  Vec<f32>,
}

impl PixelTensor {
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    image_size: usize,
}

impl Preprocessor {
    pub fn new(image_size: usize) -> Self {
        Self { image_size }
    }

    /// Read, decode and normalise the image at `path`
    pub fn load(&self, path: &Path) -> Result<PixelTensor> {
        if !path.is_file() {
            return Err(PipelineError::MissingPath(path.to_path_buf()).into());
        }
        let bytes = fs::read(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        let image = image::load_from_memory(&bytes).map_err(|source| PipelineError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.from_image(&image))
    }

    /// Normalise an already decoded image
    pub fn from_image(&self, image: &DynamicImage) -> PixelTensor {
        let side = self.image_size as u32;

        // FilterType::Triangle is bilinear interpolation
        let rgb = image
            .resize_exact(side, side, FilterType::Triangle)
            .to_rgb8();

        // into_raw() is already row-major, channel-interleaved (HWC)
        let data: Vec<f32> = rgb
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 255.0)
            .collect();

        PixelTensor {
            shape: [1, self.image_size, self.image_size, 3],
            data,
        }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_SIZE)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_shape_and_range_at_224() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("leaf.png");
        let img  = RgbImage::from_fn(37, 53, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 200]));
        img.save(&path).unwrap();

        let t = Preprocessor::default().load(&path).unwrap();
        assert_eq!(t.shape, [1, 224, 224, 3]);
        assert_eq!(t.data.len(), 224 * 224 * 3);
        assert!(t.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_solid_color_is_scaled_by_255() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 0, 51])));
        let t   = Preprocessor::new(4).from_image(&img);
        // Channel-last: every pixel is (1.0, 0.0, 0.2)
        for px in t.data.chunks(3) {
            assert!((px[0] - 1.0).abs() < 1e-6);
            assert!(px[1].abs() < 1e-6);
            assert!((px[2] - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_deterministic() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(30, 20, |x, y| Rgb([x as u8, y as u8, 9])));
        let p   = Preprocessor::new(16);
        assert_eq!(p.from_image(&img), p.from_image(&img));
    }

    #[test]
    fn test_grayscale_and_alpha_become_rgb() {
        let p    = Preprocessor::new(8);
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([128])));
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 4])));
        assert_eq!(p.from_image(&gray).shape, [1, 8, 8, 3]);
        assert_eq!(p.from_image(&rgba).data.len(), 8 * 8 * 3);
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();

        let err = Preprocessor::default().load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Decode { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_missing_path() {
        let err = Preprocessor::default()
            .load(Path::new("/no/such/aphid.png"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingPath(_))
        ));
    }
}
