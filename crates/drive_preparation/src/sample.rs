use ndarray::Array3;

/// One fully processed training example: a `(height, width, 3)` YUV pixel
/// array and its corrected steering label.
///
/// Samples are transient — created per generator step, stacked into a batch,
/// then dropped. Nothing caches them.
#[derive(Debug, Clone)]
pub struct Sample {
    pub pixels: Array3<f32>,
    pub label: f32,
}

impl Sample {
    pub fn new(pixels: Array3<f32>, label: f32) -> Self {
        Self { pixels, label }
    }

    /// The `(height, width, channels)` shape of the pixel array.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.pixels.dim()
    }
}
