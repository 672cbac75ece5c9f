use crate::error::PipelineError;
use anyhow::Result;
use image::RgbImage;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Decoding seam between the pipeline and the filesystem.
///
/// The generator only needs "path → RGB pixel array"; everything else about
/// where frames come from is behind this trait, which keeps decode out of
/// unit tests (tests substitute a synthetic reader).
pub trait ImageReader: Send + Sync {
    /// Decodes the frame at `path` into an 8-bit RGB image.
    fn read(&self, path: &Path) -> Result<RgbImage>;
}

/// Reads frames from disk with buffered I/O and content-based format
/// detection.
///
/// Any failure along the way (missing file, truncated data, unsupported
/// format) surfaces as [`PipelineError::Decode`] naming the offending path;
/// there is no per-sample recovery.
#[derive(Debug, Clone)]
pub struct DiskImageReader {
    buffer_size: usize,
}

impl DiskImageReader {
    /// Creates a reader with an 8KB read buffer.
    pub fn new() -> Self {
        Self { buffer_size: 8192 }
    }

    fn decode_error(path: &Path, source: image::ImageError) -> PipelineError {
        PipelineError::Decode {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Default for DiskImageReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for DiskImageReader {
    fn read(&self, path: &Path) -> Result<RgbImage> {
        let file = File::open(path)
            .map_err(|e| Self::decode_error(path, image::ImageError::IoError(e)))?;

        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|e| Self::decode_error(path, image::ImageError::IoError(e)))?;

        let decoded = image::ImageReader::new(Cursor::new(buffer))
            .with_guessed_format()
            .map_err(|e| Self::decode_error(path, image::ImageError::IoError(e)))?
            .decode()
            .map_err(|e| Self::decode_error(path, e))?;

        Ok(decoded.to_rgb8())
    }
}
