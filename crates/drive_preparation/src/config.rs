//! Configuration for the preparation pipeline.
//!
//! `PipelineConfig` stores the parameters that control splitting, batching,
//! and every augmentation stage. Defaults reproduce the tuning used for the
//! steering-angle regression dataset this pipeline targets.
//!
//! Example:
//! ```ignore
//! let config = PipelineConfig::builder()
//!     .batch_size(32)
//!     .flip_prob(0.0)
//!     .build();
//! ```

/// Configuration for dataset splitting, batching, and augmentation.
///
/// Components validate the fields they consume when they are constructed
/// (the splitter checks fractions, each transform checks its own ranges), so
/// an out-of-range value fails at setup time rather than mid-stream.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of samples per batch. Train/valid split boundaries are aligned
    /// to a multiple of this.
    pub batch_size: usize,
    /// Fraction of rows assigned to the training split.
    pub train_fraction: f64,
    /// Cumulative fraction marking the end of the validation split.
    pub valid_fraction: f64,
    /// First image row kept by the crop (everything above is sky).
    pub crop_top: u32,
    /// One past the last image row kept by the crop (everything below is hood).
    pub crop_bottom: u32,
    /// Maximum horizontal shear displacement in pixels, drawn from
    /// `[-shear_range, shear_range]`.
    pub shear_range: i32,
    /// Probability of mirroring a sample (and negating its label).
    pub flip_prob: f64,
    /// Uniform range for the brightness multiplier.
    pub brightness_range: (f32, f32),
    /// Probability that the brightness multiplier is drawn per channel
    /// instead of once for the whole image.
    pub per_channel_prob: f64,
    /// Uniform range for the contrast normalization scale.
    pub contrast_range: (f32, f32),
    /// Probability of applying a Gaussian blur.
    pub blur_prob: f64,
    /// Blur sigma is drawn uniformly from `[0, blur_sigma_max]`.
    pub blur_sigma_max: f32,
    /// Output width after resizing.
    pub target_width: u32,
    /// Output height after resizing.
    pub target_height: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            train_fraction: 0.75,
            valid_fraction: 0.95,
            crop_top: 35,
            crop_bottom: 135,
            shear_range: 100,
            flip_prob: 0.5,
            brightness_range: (0.8, 1.2),
            per_channel_prob: 0.2,
            contrast_range: (0.75, 1.5),
            blur_prob: 0.3,
            blur_sigma_max: 3.0,
            target_width: 200,
            target_height: 66,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for [`PipelineConfig`] with method chaining.
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set the batch size (must be > 0 to be usable by the splitter).
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the training fraction.
    pub fn train_fraction(mut self, fraction: f64) -> Self {
        self.config.train_fraction = fraction;
        self
    }

    /// Set the cumulative validation fraction.
    pub fn valid_fraction(mut self, fraction: f64) -> Self {
        self.config.valid_fraction = fraction;
        self
    }

    /// Set the crop band, `[top, bottom)` in image rows.
    pub fn crop_band(mut self, top: u32, bottom: u32) -> Self {
        self.config.crop_top = top;
        self.config.crop_bottom = bottom;
        self
    }

    /// Set the maximum shear displacement in pixels.
    pub fn shear_range(mut self, range: i32) -> Self {
        self.config.shear_range = range;
        self
    }

    /// Set the horizontal flip probability.
    pub fn flip_prob(mut self, p: f64) -> Self {
        self.config.flip_prob = p;
        self
    }

    /// Set the brightness multiplier range.
    pub fn brightness_range(mut self, low: f32, high: f32) -> Self {
        self.config.brightness_range = (low, high);
        self
    }

    /// Set the probability of per-channel brightness factors.
    pub fn per_channel_prob(mut self, p: f64) -> Self {
        self.config.per_channel_prob = p;
        self
    }

    /// Set the contrast normalization range.
    pub fn contrast_range(mut self, low: f32, high: f32) -> Self {
        self.config.contrast_range = (low, high);
        self
    }

    /// Set the blur probability.
    pub fn blur_prob(mut self, p: f64) -> Self {
        self.config.blur_prob = p;
        self
    }

    /// Set the maximum blur sigma.
    pub fn blur_sigma_max(mut self, sigma: f32) -> Self {
        self.config.blur_sigma_max = sigma;
        self
    }

    /// Set the output resolution.
    pub fn target_resolution(mut self, width: u32, height: u32) -> Self {
        self.config.target_width = width;
        self.config.target_height = height;
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
