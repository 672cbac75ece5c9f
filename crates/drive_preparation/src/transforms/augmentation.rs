use crate::transforms::Stage;
use anyhow::{ensure, Result};
use image::{imageops, RgbImage};
use rand::rngs::StdRng;
use rand::Rng;

/// Mirrors the image left-right and negates the label with probability `p`.
///
/// Steering left through a mirrored scene is steering right through the
/// original, so image and label must always flip together: the two halves of
/// this stage are never applied independently.
#[derive(Debug)]
pub struct RandomHorizontalFlip {
    p: f64,
}

impl RandomHorizontalFlip {
    pub fn new(p: f64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&p),
            "Probability must be in [0.0, 1.0] range (got {})",
            p
        );
        Ok(Self { p })
    }
}

impl Stage for RandomHorizontalFlip {
    fn apply(&self, image: RgbImage, label: f32, rng: &mut StdRng) -> Result<(RgbImage, f32)> {
        if rng.random_bool(self.p) {
            Ok((imageops::flip_horizontal(&image), -label))
        } else {
            Ok((image, label))
        }
    }
}
