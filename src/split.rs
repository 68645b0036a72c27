//! Train/val split list generation.
//!
//! Shuffles the image files under `<root>/images` and writes `train.txt`
//! and `val.txt` into the root, one image path per line. Stateless apart
//! from the two output files; a seed makes the shuffle reproducible.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::collect_image_files;
use crate::error::YolovetError;

/// Options for one split run.
#[derive(Clone, Debug)]
pub struct SplitOptions {
    /// Fraction of images assigned to the training list.
    pub ratio: f64,
    /// Seed for a reproducible shuffle.
    pub seed: Option<u64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            ratio: 0.8,
            seed: None,
        }
    }
}

/// Validates split options before running.
pub fn validate_split_options(opts: &SplitOptions) -> Result<(), YolovetError> {
    if !(0.0 < opts.ratio && opts.ratio < 1.0) {
        return Err(YolovetError::InvalidSplitParams {
            message: "--ratio must lie strictly between 0.0 and 1.0".to_string(),
        });
    }
    Ok(())
}

/// Counts and output locations from one split run.
#[derive(Clone, Debug)]
pub struct SplitReport {
    pub train: usize,
    pub val: usize,
    pub train_list: PathBuf,
    pub val_list: PathBuf,
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  train: {} image(s) -> {}",
            self.train,
            self.train_list.display()
        )?;
        writeln!(
            f,
            "  val: {} image(s) -> {}",
            self.val,
            self.val_list.display()
        )
    }
}

/// Splits the images under `<root>/images` into train/val lists.
pub fn split_dataset(root: &Path, opts: &SplitOptions) -> Result<SplitReport, YolovetError> {
    validate_split_options(opts)?;

    let images_dir = root.join("images");
    if !images_dir.is_dir() {
        return Err(YolovetError::LayoutInvalid {
            path: images_dir,
            message: "expected an images/ directory".to_string(),
        });
    }

    let mut files = collect_image_files(&images_dir)?;
    if files.is_empty() {
        return Err(YolovetError::NoImagesFound { path: images_dir });
    }

    if let Some(seed) = opts.seed {
        let mut rng = StdRng::seed_from_u64(seed);
        files.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        files.shuffle(&mut rng);
    }

    let split_idx = (files.len() as f64 * opts.ratio) as usize;
    let (train_files, val_files) = files.split_at(split_idx);

    let train_list = root.join("train.txt");
    let val_list = root.join("val.txt");
    write_list(&train_list, train_files)?;
    write_list(&val_list, val_files)?;

    Ok(SplitReport {
        train: train_files.len(),
        val: val_files.len(),
        train_list,
        val_list,
    })
}

fn write_list(path: &Path, files: &[PathBuf]) -> Result<(), YolovetError> {
    let mut file = File::create(path)?;
    for entry in files {
        writeln!(file, "{}", entry.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_images(root: &Path, count: usize) {
        let images = root.join("images");
        fs::create_dir_all(&images).expect("create images");
        for i in 0..count {
            fs::write(images.join(format!("img_{:02}.jpg", i)), b"x").expect("write image");
        }
    }

    #[test]
    fn rejects_out_of_range_ratios() {
        for ratio in [0.0, 1.0, -0.5, 1.5] {
            let opts = SplitOptions { ratio, seed: None };
            assert!(validate_split_options(&opts).is_err(), "ratio {}", ratio);
        }
    }

    #[test]
    fn splits_at_the_ratio_boundary() {
        let temp = tempfile::tempdir().expect("create temp dir");
        make_images(temp.path(), 10);

        let report = split_dataset(temp.path(), &SplitOptions::default()).expect("split");
        assert_eq!(report.train, 8);
        assert_eq!(report.val, 2);

        let train = fs::read_to_string(temp.path().join("train.txt")).expect("read train");
        let val = fs::read_to_string(temp.path().join("val.txt")).expect("read val");
        assert_eq!(train.lines().count(), 8);
        assert_eq!(val.lines().count(), 2);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let temp = tempfile::tempdir().expect("create temp dir");
        make_images(temp.path(), 9);

        let opts = SplitOptions {
            ratio: 0.5,
            seed: Some(42),
        };
        split_dataset(temp.path(), &opts).expect("first split");
        let first = fs::read_to_string(temp.path().join("train.txt")).expect("read first");

        split_dataset(temp.path(), &opts).expect("second split");
        let second = fs::read_to_string(temp.path().join("train.txt")).expect("read second");
        assert_eq!(first, second);
    }

    #[test]
    fn every_image_lands_in_exactly_one_list() {
        let temp = tempfile::tempdir().expect("create temp dir");
        make_images(temp.path(), 7);

        let opts = SplitOptions {
            ratio: 0.6,
            seed: Some(7),
        };
        let report = split_dataset(temp.path(), &opts).expect("split");
        assert_eq!(report.train + report.val, 7);

        let train = fs::read_to_string(temp.path().join("train.txt")).expect("read train");
        let val = fs::read_to_string(temp.path().join("val.txt")).expect("read val");
        let mut all: Vec<&str> = train.lines().chain(val.lines()).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn empty_image_dir_is_an_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("images")).expect("create images");

        let err = split_dataset(temp.path(), &SplitOptions::default()).unwrap_err();
        assert!(matches!(err, YolovetError::NoImagesFound { .. }));
    }
}
