//! Dataset preparation for steering-angle regression.
//!
//! Turns a recorded driving log (three camera frames plus a steering angle
//! per row) into an endless stream of randomized, augmented mini-batches.
//!
//! # Architecture overview
//!
//! ```text
//!                  ┌──────────┐
//!                  │ RowTable │ (driving log, loaded once and shuffled)
//!                  └────┬─────┘
//!                       ↓
//!               ┌────────────────┐
//!               │ DatasetSplitter│ (batch-aligned train/valid/test)
//!               └───────┬────────┘
//!                       ↓ one split per generator
//!               ┌────────────────┐
//!               │ BatchGenerator │ ←── CameraPolicy (viewpoint + label offset)
//!               └───────┬────────┘
//!                       │ per row: decode via ImageReader
//!                       ↓
//!              ┌─────────────────┐
//!              │ SampleProcessor │ (crop → jitter → shear → flip → resize → YUV)
//!              └────────┬────────┘
//!                       ↓
//!                  ┌─────────┐
//!                  │  Batch  │ (images (N,66,200,3), labels (N,))
//!                  └─────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let config = PipelineConfig::default();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let mut table = RowTable::from_csv("driving_log.csv")?;
//! table.shuffle(&mut rng);
//!
//! let splits = DatasetSplitter::split(table, &config)?;
//! let mut train = BatchGenerator::new(
//!     splits.train, CameraPolicy::Training, &config, DiskImageReader::new(), None,
//! )?;
//! let mut valid = BatchGenerator::new(
//!     splits.valid, CameraPolicy::Evaluation, &config, DiskImageReader::new(), None,
//! )?;
//!
//! for batch in train.by_ref().take(steps_per_epoch) {
//!     let batch = batch?;
//!     // feed batch.images / batch.labels to the model
//! }
//! ```

pub mod batch;
pub mod camera;
pub mod config;
pub mod error;
pub mod generator;
pub mod processor;
pub mod row;
pub mod sample;
pub mod split;
pub mod transforms;

pub use batch::Batch;
pub use camera::{Camera, CameraPolicy, CAMERA_STEERING_CORRECTION};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::PipelineError;
pub use generator::BatchGenerator;
pub use processor::SampleProcessor;
pub use row::{Row, RowTable};
pub use sample::Sample;
pub use split::{DatasetSplits, DatasetSplitter};
pub use transforms::{DiskImageReader, ImageReader};
