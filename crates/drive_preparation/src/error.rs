use std::path::PathBuf;

/// Fatal precondition failures the pipeline can report.
///
/// The pipeline assumes a clean, pre-validated dataset: there is no retry or
/// skip-and-continue policy, so every variant here aborts the batch (or the
/// setup step) it occurred in. Errors cross public APIs as `anyhow::Error`;
/// callers that need the category can downcast to this enum.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Split fractions must satisfy `0 < train < valid < 1`.
    #[error("invalid split fractions: train={train}, valid={valid} (expected 0 < train < valid < 1)")]
    InvalidFractions { train: f64, valid: f64 },

    /// The table cannot fill one batch-aligned train and validation split.
    #[error("dataset of {rows} rows is too small for batch size {batch_size}")]
    DatasetTooSmall { rows: usize, batch_size: usize },

    /// A referenced image could not be opened or decoded.
    #[error("failed to decode image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The input frame does not cover the configured crop band, which means
    /// the capture resolution upstream does not match expectations.
    #[error("image height {height} does not cover the crop band [{top}, {bottom})")]
    CropOutOfBounds { height: u32, top: u32, bottom: u32 },
}
