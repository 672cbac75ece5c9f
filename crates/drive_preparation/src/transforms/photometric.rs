use crate::transforms::Stage;
use anyhow::{ensure, Result};
use image::{imageops, RgbImage};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Randomized brightness/contrast/blur jitter.
///
/// Three operations, each freshly parameterized per call and applied in a
/// randomly permuted order:
/// - multiply every intensity by a factor from `brightness_range`, drawn
///   once per image or (with `per_channel_prob`) once per channel;
/// - contrast normalization: rescale around mid-gray by a factor from
///   `contrast_range`;
/// - with `blur_prob`, a Gaussian blur with sigma from `[0, blur_sigma_max]`.
///
/// Purely photometric: geometry and label pass through untouched.
#[derive(Debug)]
pub struct PhotometricJitter {
    brightness_range: (f32, f32),
    per_channel_prob: f64,
    contrast_range: (f32, f32),
    blur_prob: f64,
    blur_sigma_max: f32,
}

#[derive(Clone, Copy)]
enum Op {
    Multiply,
    Contrast,
    Blur,
}

impl PhotometricJitter {
    pub fn new(
        brightness_range: (f32, f32),
        per_channel_prob: f64,
        contrast_range: (f32, f32),
        blur_prob: f64,
        blur_sigma_max: f32,
    ) -> Result<Self> {
        for (name, (lo, hi)) in [
            ("brightness", brightness_range),
            ("contrast", contrast_range),
        ] {
            ensure!(
                0.0 < lo && lo <= hi,
                "{} range must satisfy 0 < low <= high (got {}..{})",
                name,
                lo,
                hi
            );
        }
        for (name, p) in [("per_channel", per_channel_prob), ("blur", blur_prob)] {
            ensure!(
                (0.0..=1.0).contains(&p),
                "{} probability must be in [0.0, 1.0] (got {})",
                name,
                p
            );
        }
        ensure!(
            blur_sigma_max >= 0.0,
            "Blur sigma must be >= 0 (got {})",
            blur_sigma_max
        );
        Ok(Self {
            brightness_range,
            per_channel_prob,
            contrast_range,
            blur_prob,
            blur_sigma_max,
        })
    }

    fn multiply(&self, image: &mut RgbImage, rng: &mut StdRng) {
        let (lo, hi) = self.brightness_range;
        let factors = if rng.random_bool(self.per_channel_prob) {
            [
                rng.random_range(lo..=hi),
                rng.random_range(lo..=hi),
                rng.random_range(lo..=hi),
            ]
        } else {
            let f = rng.random_range(lo..=hi);
            [f, f, f]
        };
        for pixel in image.pixels_mut() {
            for c in 0..3 {
                pixel.0[c] = (pixel.0[c] as f32 * factors[c]).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    fn contrast(&self, image: &mut RgbImage, rng: &mut StdRng) {
        let (lo, hi) = self.contrast_range;
        let alpha = rng.random_range(lo..=hi);
        for pixel in image.pixels_mut() {
            for c in 0..3 {
                let v = (pixel.0[c] as f32 - 128.0) * alpha + 128.0;
                pixel.0[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    fn blur(&self, image: &mut RgbImage, rng: &mut StdRng) {
        if !rng.random_bool(self.blur_prob) {
            return;
        }
        let sigma = rng.random_range(0.0..=self.blur_sigma_max);
        // Sub-perceptual sigmas are a no-op; skip the filter pass.
        if sigma < 0.05 {
            return;
        }
        *image = imageops::blur(image, sigma);
    }
}

impl Stage for PhotometricJitter {
    fn apply(&self, mut image: RgbImage, label: f32, rng: &mut StdRng) -> Result<(RgbImage, f32)> {
        let mut order = [Op::Multiply, Op::Contrast, Op::Blur];
        order.shuffle(rng);
        for op in order {
            match op {
                Op::Multiply => self.multiply(&mut image, rng),
                Op::Contrast => self.contrast(&mut image, rng),
                Op::Blur => self.blur(&mut image, rng),
            }
        }
        Ok((image, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::SeedableRng;

    fn jitter() -> PhotometricJitter {
        PhotometricJitter::new((0.8, 1.2), 0.2, (0.75, 1.5), 0.3, 3.0).unwrap()
    }

    fn gradient_image() -> RgbImage {
        let mut img = RgbImage::new(64, 32);
        for y in 0..32 {
            for x in 0..64 {
                img.put_pixel(x, y, Rgb([(x * 4) as u8, (y * 8) as u8, 100]));
            }
        }
        img
    }

    #[test]
    fn preserves_shape_and_label() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let (out, label) = jitter().apply(gradient_image(), -0.42, &mut rng)?;
        assert_eq!(out.dimensions(), (64, 32));
        assert_eq!(label, -0.42);
        Ok(())
    }

    #[test]
    fn same_seed_gives_identical_output() -> Result<()> {
        let stage = jitter();
        let mut rng_a = StdRng::seed_from_u64(5);
        let mut rng_b = StdRng::seed_from_u64(5);
        let (out_a, _) = stage.apply(gradient_image(), 0.0, &mut rng_a)?;
        let (out_b, _) = stage.apply(gradient_image(), 0.0, &mut rng_b)?;
        assert_eq!(out_a.as_raw(), out_b.as_raw());
        Ok(())
    }

    #[test]
    fn perturbs_the_image_for_most_seeds() -> Result<()> {
        let stage = jitter();
        let original = gradient_image();
        let changed = (0..5)
            .filter(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let (out, _) = stage.apply(original.clone(), 0.0, &mut rng).unwrap();
                out.as_raw() != original.as_raw()
            })
            .count();
        assert!(changed >= 1, "jitter should modify pixels for some seed");
        Ok(())
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(PhotometricJitter::new((0.0, 1.2), 0.2, (0.75, 1.5), 0.3, 3.0).is_err());
        assert!(PhotometricJitter::new((1.2, 0.8), 0.2, (0.75, 1.5), 0.3, 3.0).is_err());
        assert!(PhotometricJitter::new((0.8, 1.2), 1.5, (0.75, 1.5), 0.3, 3.0).is_err());
        assert!(PhotometricJitter::new((0.8, 1.2), 0.2, (0.75, 1.5), -0.1, 3.0).is_err());
        assert!(PhotometricJitter::new((0.8, 1.2), 0.2, (0.75, 1.5), 0.3, -1.0).is_err());
    }
}
