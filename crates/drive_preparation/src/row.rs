use crate::transforms::io::ImageReader;
use anyhow::{ensure, Context, Result};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// One record of the driving log: the three camera frames captured at the
/// same instant, the recorded steering angle, and telemetry the pipeline
/// carries but does not consume.
///
/// Rows are immutable once read and identified by their position in the
/// table that owns them.
#[derive(Debug, Clone, Deserialize)]
pub struct Row {
    pub center: PathBuf,
    pub left: PathBuf,
    pub right: PathBuf,
    pub steering: f32,
    pub throttle: f32,
    pub speed: f32,
}

/// An ordered table of [`Row`]s with a fixed column layout.
///
/// The table is created once from the driving log, shuffled once by the
/// caller, and split once; after that each split is owned by exactly one
/// generator and only its iteration *order* changes. Row content is never
/// mutated.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    rows: Vec<Row>,
}

impl RowTable {
    /// Creates a table from already-materialized rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Loads a headerless, comma-delimited driving log.
    ///
    /// Expected columns: `center_path, left_path, right_path, steering,
    /// throttle, speed`. Whitespace around fields is trimmed (recorded logs
    /// pad the path columns). A non-finite steering value is a configuration
    /// error: the pipeline assumes a clean dataset and refuses to load one
    /// that is not.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open driving log: {}", path.display()))?;

        let mut rows = Vec::new();
        for (line, record) in reader.deserialize::<Row>().enumerate() {
            let row = record.with_context(|| {
                format!("Malformed record at line {} of {}", line + 1, path.display())
            })?;
            ensure!(
                row.steering.is_finite(),
                "Non-finite steering angle {} at line {} of {}",
                row.steering,
                line + 1,
                path.display()
            );
            rows.push(row);
        }
        ensure!(
            !rows.is_empty(),
            "Driving log {} contains no rows",
            path.display()
        );

        info!(rows = rows.len(), log = %path.display(), "loaded driving log");
        Ok(Self { rows })
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Checks whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Random-access lookup by position.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Iterates over rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Shuffles the row order in place.
    ///
    /// Called once on the full table before splitting; the per-epoch
    /// reshuffle inside the generator works on an index vector instead and
    /// leaves the table untouched.
    pub fn shuffle(&mut self, rng: &mut StdRng) {
        self.rows.shuffle(rng);
    }

    /// Splits the table into three contiguous segments at `idx1` and `idx2`.
    ///
    /// Consumes the table: after splitting, each segment is exclusively owned
    /// by its consumer. Panics if `idx1 <= idx2 <= len` does not hold; the
    /// splitter validates indices before calling this.
    pub(crate) fn split_into(self, idx1: usize, idx2: usize) -> (RowTable, RowTable, RowTable) {
        let mut rows = self.rows;
        let test = rows.split_off(idx2);
        let valid = rows.split_off(idx1);
        (Self::new(rows), Self::new(valid), Self::new(test))
    }

    /// Materializes every center-camera frame with its unmodified label.
    ///
    /// Offline evaluation helper: no augmentation, no batching, decode
    /// errors abort the load. Intended for small tables (the test split);
    /// everything is held in memory at once.
    pub fn load_center_images<R: ImageReader>(
        &self,
        reader: &R,
    ) -> Result<(Vec<RgbImage>, Vec<f32>)> {
        let mut images = Vec::with_capacity(self.rows.len());
        let mut labels = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            images.push(reader.read(&row.center)?);
            labels.push(row.steering);
        }
        Ok((images, labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_log(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn parses_headerless_log_and_trims_paths() -> Result<()> {
        let file = write_log(&[
            "IMG/center_1.jpg, IMG/left_1.jpg, IMG/right_1.jpg, 0.05, 0.9, 30.1",
            "IMG/center_2.jpg, IMG/left_2.jpg, IMG/right_2.jpg, -0.12, 0.8, 29.7",
        ]);

        let table = RowTable::from_csv(file.path())?;
        assert_eq!(table.len(), 2);

        let row = table.get(0).unwrap();
        assert_eq!(row.center, PathBuf::from("IMG/center_1.jpg"));
        assert_eq!(row.left, PathBuf::from("IMG/left_1.jpg"));
        assert!((row.steering - 0.05).abs() < 1e-6);
        assert!((table.get(1).unwrap().steering + 0.12).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn rejects_non_finite_steering() {
        let file = write_log(&["c.jpg, l.jpg, r.jpg, NaN, 0.0, 0.0"]);
        assert!(RowTable::from_csv(file.path()).is_err());
    }

    #[test]
    fn rejects_empty_log() {
        let file = write_log(&[]);
        assert!(RowTable::from_csv(file.path()).is_err());
    }

    #[test]
    fn shuffle_preserves_row_multiset() -> Result<()> {
        let lines: Vec<String> = (0..50)
            .map(|i| format!("c{i}.jpg, l{i}.jpg, r{i}.jpg, 0.{i:02}, 0.0, 0.0"))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = write_log(&refs);

        let mut table = RowTable::from_csv(file.path())?;
        let before: Vec<PathBuf> = table.iter().map(|r| r.center.clone()).collect();

        let mut rng = StdRng::seed_from_u64(7);
        table.shuffle(&mut rng);

        let mut after: Vec<PathBuf> = table.iter().map(|r| r.center.clone()).collect();
        assert_ne!(after, before, "shuffle should change the order");
        after.sort();
        let mut sorted_before = before;
        sorted_before.sort();
        assert_eq!(after, sorted_before, "shuffle must not add or drop rows");
        Ok(())
    }

    #[test]
    fn split_into_produces_contiguous_segments() {
        let rows: Vec<Row> = (0..10)
            .map(|i| Row {
                center: PathBuf::from(format!("c{i}.jpg")),
                left: PathBuf::from(format!("l{i}.jpg")),
                right: PathBuf::from(format!("r{i}.jpg")),
                steering: i as f32 * 0.1,
                throttle: 0.0,
                speed: 0.0,
            })
            .collect();

        let (train, valid, test) = RowTable::new(rows).split_into(6, 8);
        assert_eq!(train.len(), 6);
        assert_eq!(valid.len(), 2);
        assert_eq!(test.len(), 2);
        assert_eq!(valid.get(0).unwrap().center, PathBuf::from("c6.jpg"));
        assert_eq!(test.get(1).unwrap().center, PathBuf::from("c9.jpg"));
    }
}
