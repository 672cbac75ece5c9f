use anyhow::{ensure, Result};
use image::{imageops, imageops::FilterType, RgbImage};
use ndarray::Array3;

// ============================================================================
// Downscale
// ============================================================================

/// Resizes to an exact target resolution, ignoring aspect ratio.
///
/// The crop band is wider than it is tall, and the model input resolution is
/// fixed, so this intentionally stretches rather than letterboxes. Bilinear
/// filtering is a sensible default for downsampling photographic frames.
#[derive(Debug)]
pub struct Downscale {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl Downscale {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "Target resolution must be positive (got {}x{})",
            width,
            height
        );
        Ok(Self {
            width,
            height,
            filter: FilterType::Triangle,
        })
    }

    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        imageops::resize(image, self.width, self.height, self.filter)
    }
}

// ============================================================================
// RgbToYuv
// ============================================================================

/// Converts an RGB image into a `(height, width, 3)` array of YUV values,
/// the representation the downstream model expects.
///
/// BT.601 weights with the chroma planes offset by 128, so all three
/// channels stay in `[0, 255]`. Values are emitted as `f32` but not
/// normalized; scaling to a unit range is the model's concern.
#[derive(Debug)]
pub struct RgbToYuv;

impl RgbToYuv {
    pub fn apply(&self, image: &RgbImage) -> Array3<f32> {
        let (width, height) = image.dimensions();
        let mut out = Array3::<f32>::zeros((height as usize, width as usize, 3));
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b] = pixel.0.map(|v| v as f32);
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            let u = -0.14713 * r - 0.28886 * g + 0.436 * b + 128.0;
            let v = 0.615 * r - 0.51499 * g - 0.10001 * b + 128.0;
            let (x, y) = (x as usize, y as usize);
            out[(y, x, 0)] = luma.clamp(0.0, 255.0);
            out[(y, x, 1)] = u.clamp(0.0, 255.0);
            out[(y, x, 2)] = v.clamp(0.0, 255.0);
        }
        out
    }
}
