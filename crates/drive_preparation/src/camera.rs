use crate::row::Row;
use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;

/// Steering offset compensating for the lateral mounting of the side
/// cameras: a frame from the left camera looks as if the car drifted left,
/// so the target is nudged right, and symmetrically for the right camera.
pub const CAMERA_STEERING_CORRECTION: f32 = 0.25;

/// One of the three viewpoints recorded per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Camera {
    Center,
    Left,
    Right,
}

impl Camera {
    /// The image path this viewpoint resolves to within a row.
    pub fn image_path<'r>(&self, row: &'r Row) -> &'r Path {
        match self {
            Camera::Center => &row.center,
            Camera::Left => &row.left,
            Camera::Right => &row.right,
        }
    }

    /// The label correction added when training on this viewpoint.
    pub fn label_correction(&self) -> f32 {
        match self {
            Camera::Center => 0.0,
            Camera::Left => CAMERA_STEERING_CORRECTION,
            Camera::Right => -CAMERA_STEERING_CORRECTION,
        }
    }
}

/// Rule for choosing a viewpoint each time a row is drawn.
///
/// Training picks uniformly among the three cameras on *every* visit: a row
/// seen in three epochs can contribute three different viewpoints, which
/// triples the effective label diversity. Evaluation always uses the center
/// camera so validation and test losses are comparable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPolicy {
    Training,
    Evaluation,
}

impl CameraPolicy {
    /// Draws the viewpoint for one visit of a row.
    pub fn select(&self, rng: &mut StdRng) -> Camera {
        match self {
            CameraPolicy::Evaluation => Camera::Center,
            CameraPolicy::Training => match rng.random_range(0..3u8) {
                0 => Camera::Center,
                1 => Camera::Left,
                _ => Camera::Right,
            },
        }
    }
}
