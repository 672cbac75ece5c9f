use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::row::RowTable;
use anyhow::{ensure, Result};
use tracing::info;

/// The three partitions produced by [`DatasetSplitter::split`].
///
/// Train and validation lengths are exact multiples of the batch size; the
/// test split absorbs the remainder and may have any length, including zero.
#[derive(Debug)]
pub struct DatasetSplits {
    pub train: RowTable,
    pub valid: RowTable,
    pub test: RowTable,
}

/// Partitions a shuffled row table into contiguous train/valid/test segments
/// with batch-aligned boundaries.
pub struct DatasetSplitter;

impl DatasetSplitter {
    /// Splits `table` at `train_fraction` and `valid_fraction`, rounding both
    /// boundaries down so the train and validation lengths are multiples of
    /// `batch_size`.
    ///
    /// The table must already be globally shuffled; order is not
    /// re-randomized here. Together the three segments cover the full table
    /// without overlap.
    ///
    /// # Errors
    /// - [`PipelineError::InvalidFractions`] unless
    ///   `0 < train_fraction < valid_fraction < 1`.
    /// - [`PipelineError::DatasetTooSmall`] when rounding leaves the train or
    ///   validation segment empty.
    pub fn split(table: RowTable, config: &PipelineConfig) -> Result<DatasetSplits> {
        let (train_fraction, valid_fraction) = (config.train_fraction, config.valid_fraction);
        let batch_size = config.batch_size;
        ensure!(batch_size > 0, "Batch size must be greater than 0");
        if !(0.0 < train_fraction && train_fraction < valid_fraction && valid_fraction < 1.0) {
            return Err(PipelineError::InvalidFractions {
                train: train_fraction,
                valid: valid_fraction,
            }
            .into());
        }

        let len = table.len();
        let mut idx1 = (len as f64 * train_fraction) as usize;
        idx1 -= idx1 % batch_size;
        let mut idx2 = (len as f64 * valid_fraction) as usize;
        idx2 -= (idx2 - idx1) % batch_size;

        if idx1 == 0 || idx2 == idx1 {
            return Err(PipelineError::DatasetTooSmall {
                rows: len,
                batch_size,
            }
            .into());
        }

        let (train, valid, test) = table.split_into(idx1, idx2);
        info!(
            train = train.len(),
            valid = valid.len(),
            test = test.len(),
            "partitioned dataset"
        );
        Ok(DatasetSplits { train, valid, test })
    }
}
