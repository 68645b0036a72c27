//! Validation statistics, the bounded error log, and report rendering.

use std::fmt;

/// Sample messages retained per error kind. Everything past the cap is
/// counted but not kept, which bounds memory on pathological datasets.
pub const SAMPLE_LIMIT: usize = 5;

/// The validator's error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// Image has no corresponding label file.
    MissingLabel,
    /// Label file exists but has zero lines.
    EmptyLabel,
    /// A label line does not have 5 fields, or a field is not numeric.
    InvalidFormat,
    /// A parsed coordinate lies outside `[0, 1]`.
    OutOfBounds,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::MissingLabel,
        ErrorKind::EmptyLabel,
        ErrorKind::InvalidFormat,
        ErrorKind::OutOfBounds,
    ];

    /// Stable key used in report output.
    pub fn key(&self) -> &'static str {
        match self {
            ErrorKind::MissingLabel => "missing_labels",
            ErrorKind::EmptyLabel => "empty_labels",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::OutOfBounds => "out_of_bounds",
        }
    }
}

/// Counters for one validation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub total_images: usize,
    pub total_labels: usize,
    pub images_with_labels: usize,
    pub images_without_labels: usize,
    pub empty_labels: usize,
    pub invalid_format: usize,
    pub out_of_bounds: usize,
    pub total_bboxes: usize,
    pub valid_images: usize,
}

/// One error kind's running count plus its retained sample messages.
#[derive(Clone, Debug, Default)]
pub struct ErrorBucket {
    pub count: usize,
    pub samples: Vec<String>,
}

/// Append-only error collection, bounded to [`SAMPLE_LIMIT`] samples per
/// kind while keeping true counts.
#[derive(Clone, Debug, Default)]
pub struct ErrorLog {
    buckets: [ErrorBucket; 4],
}

impl ErrorLog {
    pub fn record(&mut self, kind: ErrorKind, message: &str) {
        let bucket = &mut self.buckets[kind as usize];
        bucket.count += 1;
        if bucket.samples.len() < SAMPLE_LIMIT {
            bucket.samples.push(message.to_string());
        }
    }

    pub fn bucket(&self, kind: ErrorKind) -> &ErrorBucket {
        &self.buckets[kind as usize]
    }

    /// Total errors recorded across all kinds.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }
}

/// Qualitative tier derived from the quality score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assessment {
    Excellent,
    NeedsPartialFixes,
    NeedsMajorRework,
}

impl Assessment {
    /// Tier boundaries: above 90 excellent, above 70 partial fixes,
    /// anything else major rework.
    pub fn from_score(score: f64) -> Self {
        if score > 90.0 {
            Assessment::Excellent
        } else if score > 70.0 {
            Assessment::NeedsPartialFixes
        } else {
            Assessment::NeedsMajorRework
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Assessment::Excellent => "dataset quality is excellent",
            Assessment::NeedsPartialFixes => "dataset quality is fair, some fixes recommended",
            Assessment::NeedsMajorRework => "dataset quality is poor, major rework needed",
        };
        write!(f, "{}", text)
    }
}

/// The result of one validation run: counters plus the bounded error log.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub stats: ValidationStats,
    pub errors: ErrorLog,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quality score in `[0, 100]`: the share of fully valid images.
    pub fn quality_score(&self) -> f64 {
        if self.stats.total_images == 0 {
            return 100.0;
        }
        self.stats.valid_images as f64 / self.stats.total_images as f64 * 100.0
    }

    pub fn assessment(&self) -> Assessment {
        Assessment::from_score(self.quality_score())
    }

    /// Total errors recorded (all kinds).
    pub fn error_count(&self) -> usize {
        self.errors.total()
    }

    /// Remediation suggestions keyed by which error kinds were seen.
    pub fn suggestions(&self) -> Vec<String> {
        let mut suggestions = Vec::new();

        if self.stats.images_without_labels > 0 {
            suggestions.push(format!(
                "{} image(s) lack label files; annotate them or remove the images",
                self.stats.images_without_labels
            ));
        }
        if self.stats.empty_labels > 0 {
            suggestions.push(format!(
                "{} label file(s) are empty; annotate them or delete the files",
                self.stats.empty_labels
            ));
        }
        if self.stats.invalid_format > 0 {
            suggestions.push(format!(
                "{} label line(s) are malformed; rewrite them as 'class_id center_x center_y width height'",
                self.stats.invalid_format
            ));
        }
        if self.stats.out_of_bounds > 0 {
            suggestions.push(format!(
                "{} label line(s) have coordinates outside [0, 1]; fix the coordinate values",
                self.stats.out_of_bounds
            ));
        }

        if suggestions.is_empty() {
            suggestions.push("no fixes needed, the dataset is ready to use".to_string());
        }

        suggestions
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        let percent = |part: usize| {
            if stats.total_images == 0 {
                0.0
            } else {
                part as f64 / stats.total_images as f64 * 100.0
            }
        };

        writeln!(f, "=== dataset statistics ===")?;
        writeln!(f, "total images: {}", stats.total_images)?;
        writeln!(f, "total label files: {}", stats.total_labels)?;
        writeln!(
            f,
            "images with labels: {} ({:.1}%)",
            stats.images_with_labels,
            percent(stats.images_with_labels)
        )?;
        writeln!(
            f,
            "images without labels: {} ({:.1}%)",
            stats.images_without_labels,
            percent(stats.images_without_labels)
        )?;
        writeln!(f, "empty label files: {}", stats.empty_labels)?;
        writeln!(f, "invalid-format labels: {}", stats.invalid_format)?;
        writeln!(f, "out-of-range labels: {}", stats.out_of_bounds)?;
        writeln!(f, "total bounding boxes: {}", stats.total_bboxes)?;
        writeln!(
            f,
            "fully valid images: {} ({:.1}%)",
            stats.valid_images,
            percent(stats.valid_images)
        )?;

        writeln!(f)?;
        writeln!(f, "=== error summary ===")?;
        for kind in ErrorKind::ALL {
            let bucket = self.errors.bucket(kind);
            if bucket.count == 0 {
                writeln!(f, "{}: no errors", kind.key())?;
                continue;
            }

            writeln!(f, "{}: {} error(s)", kind.key(), bucket.count)?;
            for sample in &bucket.samples {
                writeln!(f, "  - {}", sample)?;
            }
            if bucket.count > bucket.samples.len() {
                writeln!(
                    f,
                    "  - ... and {} more not shown",
                    bucket.count - bucket.samples.len()
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "quality score: {:.1}/100", self.quality_score())?;
        writeln!(f, "{}", self.assessment())?;

        Ok(())
    }
}
