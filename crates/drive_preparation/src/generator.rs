use crate::batch::Batch;
use crate::camera::CameraPolicy;
use crate::config::PipelineConfig;
use crate::processor::SampleProcessor;
use crate::row::RowTable;
use crate::transforms::ImageReader;
use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// An endless stream of augmented mini-batches over one split.
///
/// The loop-forever protocol is held as explicit state — the current epoch's
/// shuffled index order plus an offset into it — instead of implicit control
/// flow. `next()` slices the next `batch_size` window; when the order is
/// exhausted it reshuffles and starts over, so epoch boundaries are
/// invisible to the consumer and the final window of an epoch may be shorter
/// when the split length is not a multiple of the batch size.
///
/// Each instance owns its split, its processor, and its RNG: a training and
/// a validation generator interleave from one caller with no shared mutable
/// state. Passing the same seed to two instances over the same split
/// reproduces the same stream; passing `None` seeds from entropy.
///
/// Decode and geometry failures abort the batch under construction and
/// surface as an `Err` item. The stream itself never ends; it is torn down
/// by dropping the iterator.
pub struct BatchGenerator<R: ImageReader> {
    rows: RowTable,
    order: Vec<usize>,
    offset: usize,
    epoch: usize,
    batch_size: usize,
    policy: CameraPolicy,
    processor: SampleProcessor,
    reader: R,
    rng: StdRng,
}

impl<R: ImageReader> BatchGenerator<R> {
    /// Creates a generator over `rows` with the given camera policy.
    ///
    /// The first `next()` call starts from a fresh shuffle of the split.
    pub fn new(
        rows: RowTable,
        policy: CameraPolicy,
        config: &PipelineConfig,
        reader: R,
        seed: Option<u64>,
    ) -> Result<Self> {
        ensure!(!rows.is_empty(), "Cannot generate batches from an empty split");
        ensure!(config.batch_size > 0, "Batch size must be greater than 0");

        let processor = SampleProcessor::new(config)?;
        let effective_seed = seed.unwrap_or_else(|| rand::rng().random());
        let order: Vec<usize> = (0..rows.len()).collect();
        let offset = rows.len(); // exhausted, so the first next() reshuffles

        Ok(Self {
            rows,
            order,
            offset,
            epoch: 0,
            batch_size: config.batch_size,
            policy,
            processor,
            reader,
            rng: StdRng::seed_from_u64(effective_seed),
        })
    }

    fn next_batch(&mut self) -> Result<Batch> {
        if self.offset >= self.order.len() {
            self.order.shuffle(&mut self.rng);
            self.offset = 0;
            self.epoch += 1;
            debug!(
                epoch = self.epoch,
                rows = self.order.len(),
                "reshuffled split for a new epoch"
            );
        }

        let end = (self.offset + self.batch_size).min(self.order.len());
        let window = self.order[self.offset..end].to_vec();
        self.offset = end;

        let mut samples = Vec::with_capacity(window.len());
        for index in window {
            let row = self.rows.get(index).expect("index came from order vector");
            // Viewpoint is redrawn on every visit, so a row contributes
            // different cameras across epochs.
            let camera = self.policy.select(&mut self.rng);
            let image = self.reader.read(camera.image_path(row))?;
            let label = row.steering + camera.label_correction();
            samples.push(self.processor.process(image, label, &mut self.rng)?);
        }
        samples.shuffle(&mut self.rng);
        Batch::stack(samples)
    }
}

impl<R: ImageReader> Iterator for BatchGenerator<R> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_batch())
    }
}
