use anyhow::Result;
use image::{Rgb, RgbImage};
use std::fmt::Write as _;
use std::path::PathBuf;
use tempfile::TempDir;

/// A 320x160 frame with per-row and per-column structure, shaded by `tint`
/// so frames from different rows are distinguishable.
pub fn camera_frame(tint: u8) -> RgbImage {
    let mut img = RgbImage::new(320, 160);
    for y in 0..160 {
        for x in 0..320 {
            img.put_pixel(x, y, Rgb([(x % 256) as u8, y as u8, tint]));
        }
    }
    img
}

/// On-disk dataset fixture: `n` rows of three PNG frames each, referenced by
/// a headerless driving log, all inside a temp directory.
pub struct DatasetFixture {
    // Held so the directory outlives the fixture.
    _dir: TempDir,
    pub log_path: PathBuf,
}

impl DatasetFixture {
    pub fn with_rows(n: usize) -> Result<Self> {
        let dir = TempDir::new()?;
        let mut log = String::new();

        for i in 0..n {
            let mut paths = Vec::with_capacity(3);
            for camera in ["center", "left", "right"] {
                let path = dir.path().join(format!("{camera}_{i}.png"));
                camera_frame((i % 256) as u8).save(&path)?;
                paths.push(path);
            }
            writeln!(
                log,
                "{}, {}, {}, {:.3}, 0.0, 0.0",
                paths[0].display(),
                paths[1].display(),
                paths[2].display(),
                i as f32 * 0.01,
            )?;
        }

        let log_path = dir.path().join("driving_log.csv");
        std::fs::write(&log_path, log)?;
        Ok(Self { _dir: dir, log_path })
    }
}
