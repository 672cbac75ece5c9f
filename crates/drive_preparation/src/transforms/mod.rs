//! Per-sample transforms for the augmentation pipeline.
//!
//! # Module organization
//!
//! ```text
//! transforms/
//! ├── io.rs           → image decoding seam (ImageReader, DiskImageReader)
//! ├── geometric.rs    → spatial stages (crop, shear with label correction)
//! ├── photometric.rs  → appearance jitter (brightness, contrast, blur)
//! ├── augmentation.rs → horizontal flip with label negation
//! └── conversion.rs   → resize to target resolution + YUV array output
//! ```
//!
//! Geometry and appearance stages implement [`Stage`] and are composed in a
//! fixed order by `SampleProcessor`; the conversion steps run after them and
//! change the value type, so they stay outside the trait.

pub mod augmentation;
pub mod conversion;
pub mod geometric;
pub mod io;
pub mod photometric;

pub use augmentation::RandomHorizontalFlip;
pub use conversion::{Downscale, RgbToYuv};
pub use geometric::{RandomShear, RoadCrop};
pub use io::{DiskImageReader, ImageReader};
pub use photometric::PhotometricJitter;

use anyhow::Result;
use image::RgbImage;
use rand::rngs::StdRng;

/// A label-coupled image transform.
///
/// Stages take and return an owned `(image, label)` pair so geometric
/// distortions can apply their compensating label adjustment in the same
/// step; stages that do not touch the label pass it through unchanged.
/// Randomness is injected rather than drawn from a global source, so a
/// seeded `StdRng` makes any stage deterministic under test.
pub trait Stage: Send + Sync {
    fn apply(&self, image: RgbImage, label: f32, rng: &mut StdRng) -> Result<(RgbImage, f32)>;
}
