//! Dataset validation for YOLO label trees.
//!
//! Each image moves through a small state machine: no matching label file
//! (terminal, counted), an empty label file (terminal, counted), or a
//! line-by-line classification that ends `Valid` only when every line
//! parses and stays in range. Classification ([`classify_image`]) is
//! separated from accumulation and presentation so the per-image pass can
//! be tested in isolation; the driver folds image reports into a
//! [`ValidationReport`] and writes the durable log as it goes.

mod logfile;
mod report;

pub use logfile::ValidationLog;
pub use report::{
    Assessment, ErrorBucket, ErrorKind, ErrorLog, ValidationReport, ValidationStats, SAMPLE_LIMIT,
};

use std::fs;
use std::io;
use std::path::Path;

use crate::dataset::{collect_image_files, collect_label_files, rel_string, LABEL_EXTENSION};
use crate::error::YolovetError;
use crate::label::{classify_label_line, LineClass, ParseError};

/// Terminal state of one image's validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageVerdict {
    MissingLabel,
    EmptyLabel,
    Invalid,
    Valid,
}

/// One classified per-line failure.
#[derive(Clone, Debug)]
pub struct LineError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Everything observed about one image/label pair.
#[derive(Clone, Debug)]
pub struct ImageReport {
    pub image: String,
    pub label_file: String,
    pub verdict: ImageVerdict,
    pub line_errors: Vec<LineError>,
    pub bboxes_seen: usize,
}

/// Classifies one image/label pair.
///
/// Errors are cumulative, not short-circuiting: a failing line flips the
/// image's validity but every remaining line is still classified. Lines
/// with five fields count toward `bboxes_seen` even when a field is not
/// numeric or a coordinate is out of range; lines with the wrong field
/// count do not.
pub fn classify_image(image: &str, label_file: &str, label_path: &Path) -> io::Result<ImageReport> {
    if !label_path.is_file() {
        return Ok(ImageReport {
            image: image.to_string(),
            label_file: label_file.to_string(),
            verdict: ImageVerdict::MissingLabel,
            line_errors: Vec::new(),
            bboxes_seen: 0,
        });
    }

    let content = fs::read_to_string(label_path)?;
    if content.lines().next().is_none() {
        return Ok(ImageReport {
            image: image.to_string(),
            label_file: label_file.to_string(),
            verdict: ImageVerdict::EmptyLabel,
            line_errors: Vec::new(),
            bboxes_seen: 0,
        });
    }

    let mut line_errors = Vec::new();
    let mut bboxes_seen = 0;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        match classify_label_line(line) {
            LineClass::Valid(_) => bboxes_seen += 1,
            LineClass::OutOfRange(record) => {
                bboxes_seen += 1;
                line_errors.push(LineError {
                    kind: ErrorKind::OutOfBounds,
                    message: format!(
                        "coordinates out of range {}:{} - [{}, {}, {}, {}] (image: {})",
                        label_file, line_num, record.cx, record.cy, record.w, record.h, image
                    ),
                });
            }
            LineClass::Malformed(err) => {
                if matches!(err, ParseError::NonNumeric { .. }) {
                    bboxes_seen += 1;
                }
                line_errors.push(LineError {
                    kind: ErrorKind::InvalidFormat,
                    message: format!(
                        "bad format {}:{} - '{}' (image: {})",
                        label_file,
                        line_num,
                        line.trim(),
                        image
                    ),
                });
            }
        }
    }

    let verdict = if line_errors.is_empty() {
        ImageVerdict::Valid
    } else {
        ImageVerdict::Invalid
    };

    Ok(ImageReport {
        image: image.to_string(),
        label_file: label_file.to_string(),
        verdict,
        line_errors,
        bboxes_seen,
    })
}

/// Validates a whole dataset: every image under `images_dir` against its
/// matching label file under `labels_dir`.
///
/// Per-record failures never abort the run; the only fatal conditions are
/// missing input directories and an image directory with nothing in it.
/// Events and the final summary are appended to `log` incrementally.
pub fn validate_dataset(
    images_dir: &Path,
    labels_dir: &Path,
    log: &mut ValidationLog,
) -> Result<ValidationReport, YolovetError> {
    if !images_dir.is_dir() {
        return Err(YolovetError::LayoutInvalid {
            path: images_dir.to_path_buf(),
            message: "image directory does not exist".to_string(),
        });
    }
    if !labels_dir.is_dir() {
        return Err(YolovetError::LayoutInvalid {
            path: labels_dir.to_path_buf(),
            message: "label directory does not exist".to_string(),
        });
    }

    let images = collect_image_files(images_dir)?;
    if images.is_empty() {
        return Err(YolovetError::NoImagesFound {
            path: images_dir.to_path_buf(),
        });
    }

    let mut result = ValidationReport::new();
    result.stats.total_images = images.len();
    result.stats.total_labels = collect_label_files(labels_dir)?.len();

    for image_path in &images {
        let rel = rel_string(images_dir, image_path);
        let label_rel = Path::new(&rel).with_extension(LABEL_EXTENSION);
        let label_file = label_rel.to_string_lossy().replace('\\', "/");
        let label_path = labels_dir.join(&label_rel);

        let image_report = classify_image(&rel, &label_file, &label_path)?;
        absorb(&mut result, &image_report, log)?;
    }

    log.summary(&result)?;
    Ok(result)
}

/// Folds one image report into the run accumulator, mirroring every event
/// into the durable log.
fn absorb(
    result: &mut ValidationReport,
    image: &ImageReport,
    log: &mut ValidationLog,
) -> io::Result<()> {
    result.stats.total_bboxes += image.bboxes_seen;

    if image.verdict == ImageVerdict::MissingLabel {
        result.stats.images_without_labels += 1;
        let message = format!(
            "missing label file: {} (image: {})",
            image.label_file, image.image
        );
        result.errors.record(ErrorKind::MissingLabel, &message);
        log.failure(&message)?;
        return Ok(());
    }

    result.stats.images_with_labels += 1;

    if image.verdict == ImageVerdict::EmptyLabel {
        result.stats.empty_labels += 1;
        let message = format!(
            "empty label file: {} (image: {})",
            image.label_file, image.image
        );
        result.errors.record(ErrorKind::EmptyLabel, &message);
        log.failure(&message)?;
        return Ok(());
    }

    for error in &image.line_errors {
        match error.kind {
            ErrorKind::InvalidFormat => result.stats.invalid_format += 1,
            ErrorKind::OutOfBounds => result.stats.out_of_bounds += 1,
            ErrorKind::MissingLabel | ErrorKind::EmptyLabel => {}
        }
        result.errors.record(error.kind, &error.message);
        log.failure(&error.message)?;
    }

    if image.verdict == ImageVerdict::Valid {
        result.stats.valid_images += 1;
        log.passed(&image.image)?;
    }

    Ok(())
}
