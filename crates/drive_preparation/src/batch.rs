use crate::sample::Sample;
use anyhow::{bail, Result};
use ndarray::{Array1, Array4, Axis};

/// A group of processed samples stacked into two parallel arrays.
///
/// `images` has shape `(N, height, width, 3)` and `labels` has shape `(N,)`;
/// index `i` of both refers to the same sample, and the two lengths are
/// equal by construction.
#[derive(Debug)]
pub struct Batch {
    pub images: Array4<f32>,
    pub labels: Array1<f32>,
}

impl Batch {
    /// Stacks samples along a new leading batch dimension.
    ///
    /// Every sample must have the same pixel shape; a mismatch means an
    /// upstream stage broke the fixed-resolution contract and is reported as
    /// an error rather than papered over.
    pub fn stack(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            bail!("Cannot stack an empty sample list");
        }

        let reference_shape = samples[0].shape();
        for (i, sample) in samples.iter().enumerate().skip(1) {
            if sample.shape() != reference_shape {
                bail!(
                    "Shape mismatch in sample {}: expected {:?}, got {:?}",
                    i,
                    reference_shape,
                    sample.shape()
                );
            }
        }

        let (height, width, channels) = reference_shape;
        let mut images = Array4::<f32>::zeros((samples.len(), height, width, channels));
        for (i, sample) in samples.iter().enumerate() {
            images.index_axis_mut(Axis(0), i).assign(&sample.pixels);
        }
        let labels = Array1::from_iter(samples.iter().map(|s| s.label));

        Ok(Self { images, labels })
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
