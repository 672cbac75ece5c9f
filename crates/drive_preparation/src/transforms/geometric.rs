use crate::error::PipelineError;
use crate::transforms::Stage;
use anyhow::{ensure, Result};
use image::{imageops, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::Rng;

// ============================================================================
// RoadCrop
// ============================================================================

/// Keeps the horizontal band of rows `[top, bottom)` across all columns.
///
/// For dashboard footage this removes the sky above the horizon and the hood
/// below it, leaving the road band the model actually learns from. The input
/// resolution is expected to be fixed upstream; a frame shorter than the
/// band is a resolution mismatch, not a per-sample condition.
#[derive(Debug)]
pub struct RoadCrop {
    top: u32,
    bottom: u32,
}

impl RoadCrop {
    pub fn new(top: u32, bottom: u32) -> Result<Self> {
        ensure!(
            top < bottom,
            "Crop band must be non-empty (got [{}, {}))",
            top,
            bottom
        );
        Ok(Self { top, bottom })
    }
}

impl Stage for RoadCrop {
    fn apply(&self, image: RgbImage, label: f32, _rng: &mut StdRng) -> Result<(RgbImage, f32)> {
        let (width, height) = image.dimensions();
        if height < self.bottom {
            return Err(PipelineError::CropOutOfBounds {
                height,
                top: self.top,
                bottom: self.bottom,
            }
            .into());
        }
        let cropped =
            imageops::crop_imm(&image, 0, self.top, width, self.bottom - self.top).to_image();
        Ok((cropped, label))
    }
}

// ============================================================================
// RandomShear
// ============================================================================

/// Random horizontal shear with compensating steering correction.
///
/// Draws an integer displacement `dx` from `[-range, range]` and warps the
/// image by the affine map that keeps the bottom corners fixed while moving
/// the mid-height center point `dx` pixels sideways. The warp simulates a
/// laterally displaced viewpoint, so the label receives the steering
/// adjustment a driver would need from that viewpoint.
///
/// Out-of-bounds samples replicate the nearest edge pixel, matching the
/// border handling of the recorded footage this was tuned on.
#[derive(Debug)]
pub struct RandomShear {
    range: i32,
}

impl RandomShear {
    /// Creates a shear stage with displacement range `[-range, range]`.
    /// A range of zero disables the distortion.
    pub fn new(range: i32) -> Result<Self> {
        ensure!(range >= 0, "Shear range must be >= 0 (got {})", range);
        Ok(Self { range })
    }

    /// Warps `image` by the shear for a fixed displacement `dx`.
    ///
    /// Exposed separately from [`Stage::apply`] so the geometry can be
    /// exercised without randomness.
    pub fn shear_by(image: &RgbImage, dx: i32) -> RgbImage {
        if dx == 0 {
            return image.clone();
        }
        let (width, height) = image.dimensions();
        let rows = height as f32;
        let mut out = RgbImage::new(width, height);
        for y in 0..height {
            // Horizontal source offset for this row: zero at the bottom edge,
            // -dx at mid-height, -2*dx at the top.
            let shift = 2.0 * dx as f32 * (y as f32 / rows - 1.0);
            for x in 0..width {
                let xs = x as f32 + shift;
                let x0 = xs.floor();
                let t = xs - x0;
                let xi0 = (x0 as i64).clamp(0, width as i64 - 1) as u32;
                let xi1 = (x0 as i64 + 1).clamp(0, width as i64 - 1) as u32;
                let p0 = image.get_pixel(xi0, y).0;
                let p1 = image.get_pixel(xi1, y).0;
                let mut px = [0u8; 3];
                for c in 0..3 {
                    px[c] = ((1.0 - t) * p0[c] as f32 + t * p1[c] as f32).round() as u8;
                }
                out.put_pixel(x, y, Rgb(px));
            }
        }
        out
    }

    /// Steering adjustment for a displacement of `dx` pixels on an image of
    /// the given height.
    ///
    /// `dx` is scaled by the half-height (the vertical lever arm of the
    /// warp), converted to degrees of arc on a 25-unit turning radius, and
    /// divided by the 6:1 steering ratio.
    pub fn steering_delta(dx: i32, height: u32) -> f32 {
        let half_height = height as f32 / 2.0;
        dx as f32 / half_height * 360.0 / (2.0 * std::f32::consts::PI * 25.0) / 6.0
    }
}

impl Stage for RandomShear {
    fn apply(&self, image: RgbImage, label: f32, rng: &mut StdRng) -> Result<(RgbImage, f32)> {
        let dx = rng.random_range(-self.range..=self.range);
        let label = label + Self::steering_delta(dx, image.height());
        Ok((Self::shear_by(&image, dx), label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// 320x160 frame with the row index written into the green channel.
    fn row_coded_image() -> RgbImage {
        let mut img = RgbImage::new(320, 160);
        for y in 0..160 {
            for x in 0..320 {
                img.put_pixel(x, y, Rgb([(x % 256) as u8, y as u8, 128]));
            }
        }
        img
    }

    #[test]
    fn crop_keeps_the_road_band() -> Result<()> {
        let crop = RoadCrop::new(35, 135)?;
        let mut rng = StdRng::seed_from_u64(0);
        let (cropped, label) = crop.apply(row_coded_image(), 0.3, &mut rng)?;

        assert_eq!(cropped.dimensions(), (320, 100));
        assert_eq!(label, 0.3);
        // Top row of the crop is source row 35, bottom row is source row 134.
        assert_eq!(cropped.get_pixel(0, 0).0[1], 35);
        assert_eq!(cropped.get_pixel(0, 99).0[1], 134);
        Ok(())
    }

    #[test]
    fn crop_rejects_short_frames() -> Result<()> {
        let crop = RoadCrop::new(35, 135)?;
        let short = RgbImage::new(320, 100);
        let mut rng = StdRng::seed_from_u64(0);
        let err = crop.apply(short, 0.0, &mut rng).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::CropOutOfBounds { height: 100, .. })
        ));
        Ok(())
    }

    #[test]
    fn zero_displacement_is_identity() {
        let img = row_coded_image();
        let sheared = RandomShear::shear_by(&img, 0);
        assert_eq!(img.as_raw(), sheared.as_raw());
        assert_eq!(RandomShear::steering_delta(0, 100), 0.0);
    }

    #[test]
    fn steering_delta_increases_with_displacement() {
        let mut previous = RandomShear::steering_delta(-100, 100);
        for dx in -99..=100 {
            let delta = RandomShear::steering_delta(dx, 100);
            assert!(
                delta > previous,
                "delta must be strictly increasing at dx={dx}"
            );
            previous = delta;
        }
        // Antisymmetric around zero.
        let plus = RandomShear::steering_delta(50, 100);
        let minus = RandomShear::steering_delta(-50, 100);
        assert!((plus + minus).abs() < 1e-6);
    }

    #[test]
    fn shear_preserves_dimensions_and_shifts_midline() {
        let img = row_coded_image();
        let dx = 40;
        let sheared = RandomShear::shear_by(&img, dx);
        assert_eq!(sheared.dimensions(), img.dimensions());

        // At mid-height the content moves right by dx: the output pixel at
        // x reads from source x - dx (red channel encodes x % 256).
        let y = 80;
        let x = 200u32;
        let expected = img.get_pixel(x - dx as u32, y).0[0];
        assert_eq!(sheared.get_pixel(x, y).0[0], expected);
    }

    #[test]
    fn stage_adds_matching_label_correction() -> Result<()> {
        // With a seeded RNG, apply() must add exactly steering_delta(dx) for
        // the dx it drew. Re-draw the same dx from an identically seeded RNG.
        let shear = RandomShear::new(100)?;
        let img = row_coded_image();

        let mut rng = StdRng::seed_from_u64(99);
        let (_, label) = shear.apply(img.clone(), 0.25, &mut rng)?;

        let mut replay = StdRng::seed_from_u64(99);
        let dx = replay.random_range(-100..=100);
        let expected = 0.25 + RandomShear::steering_delta(dx, img.height());
        assert!((label - expected).abs() < 1e-6);
        Ok(())
    }
}
