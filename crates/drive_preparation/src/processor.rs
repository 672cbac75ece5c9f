use crate::config::PipelineConfig;
use crate::sample::Sample;
use crate::transforms::{
    Downscale, PhotometricJitter, RandomHorizontalFlip, RandomShear, RgbToYuv, RoadCrop, Stage,
};
use anyhow::Result;
use image::RgbImage;
use rand::rngs::StdRng;

/// The fixed per-sample transform: crop → photometric jitter → shear → flip,
/// then resize to the target resolution and convert to YUV.
///
/// The four label-coupled stages are held as an ordered list, so tests can
/// build a processor with any subset via [`with_stages`](Self::with_stages)
/// without touching the deterministic resize/convert tail. For well-formed
/// fixed-resolution input no stage fails; a failure indicates a dataset
/// precondition violation and aborts the batch under construction.
pub struct SampleProcessor {
    stages: Vec<Box<dyn Stage>>,
    downscale: Downscale,
    convert: RgbToYuv,
}

impl SampleProcessor {
    /// Builds the full augmentation pipeline from the configuration.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(RoadCrop::new(config.crop_top, config.crop_bottom)?),
            Box::new(PhotometricJitter::new(
                config.brightness_range,
                config.per_channel_prob,
                config.contrast_range,
                config.blur_prob,
                config.blur_sigma_max,
            )?),
            Box::new(RandomShear::new(config.shear_range)?),
            Box::new(RandomHorizontalFlip::new(config.flip_prob)?),
        ];
        Self::with_stages(stages, config)
    }

    /// Builds a processor around a custom stage list.
    ///
    /// The resize/convert tail still comes from `config`; only the
    /// label-coupled stages are replaced.
    pub fn with_stages(stages: Vec<Box<dyn Stage>>, config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            stages,
            downscale: Downscale::new(config.target_width, config.target_height)?,
            convert: RgbToYuv,
        })
    }

    /// Runs one raw frame and its label through the whole pipeline.
    pub fn process(&self, image: RgbImage, label: f32, rng: &mut StdRng) -> Result<Sample> {
        let (mut image, mut label) = (image, label);
        for stage in &self.stages {
            (image, label) = stage.apply(image, label, rng)?;
        }
        let image = self.downscale.apply(&image);
        Ok(Sample::new(self.convert.apply(&image), label))
    }
}
