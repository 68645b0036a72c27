//! The durable validation log artifact.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::report::ValidationReport;

const SEPARATOR_WIDTH: usize = 50;

/// Append-only plain-text log for one validation run.
///
/// Every event is written as it happens rather than buffered for a final
/// flush, so an interrupted run still leaves a usable partial log.
pub struct ValidationLog {
    file: File,
    path: PathBuf,
}

impl ValidationLog {
    /// Creates the log file (and any missing parent directories) and
    /// writes the run header.
    pub fn create(path: &Path, images_dir: &Path, labels_dir: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(path)?;
        writeln!(
            file,
            "YOLO dataset validation log - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file, "images: {}", images_dir.display())?;
        writeln!(file, "labels: {}", labels_dir.display())?;
        writeln!(file, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        writeln!(file)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records one classified error event.
    pub fn failure(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.file, "✗ {}", message)
    }

    /// Records a fully valid image.
    pub fn passed(&mut self, image: &str) -> io::Result<()> {
        writeln!(self.file, "✓ {} passed validation", image)
    }

    /// Writes the final statistics block and remediation suggestions.
    pub fn summary(&mut self, report: &ValidationReport) -> io::Result<()> {
        writeln!(self.file)?;
        writeln!(self.file, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        write!(self.file, "{}", report)?;

        writeln!(self.file)?;
        writeln!(self.file, "fix suggestions:")?;
        for suggestion in report.suggestions() {
            writeln!(self.file, "- {}", suggestion)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_header_events_and_summary() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let log_path = temp.path().join("logs/run.log");

        let mut log = ValidationLog::create(
            &log_path,
            Path::new("/data/images"),
            Path::new("/data/labels"),
        )
        .expect("create log");

        log.failure("missing label file: a.txt (image: a.jpg)")
            .expect("log failure");
        log.passed("b.jpg").expect("log pass");

        let mut report = ValidationReport::new();
        report.stats.total_images = 2;
        report.stats.valid_images = 1;
        report.stats.images_without_labels = 1;
        log.summary(&report).expect("log summary");

        let content = fs::read_to_string(&log_path).expect("read log");
        assert!(content.contains("YOLO dataset validation log"));
        assert!(content.contains("images: /data/images"));
        assert!(content.contains("✗ missing label file: a.txt (image: a.jpg)"));
        assert!(content.contains("✓ b.jpg passed validation"));
        assert!(content.contains("quality score: 50.0/100"));
        assert!(content.contains("fix suggestions:"));
    }

    #[test]
    fn events_are_on_disk_before_the_summary_is_written() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let log_path = temp.path().join("run.log");

        let mut log =
            ValidationLog::create(&log_path, Path::new("img"), Path::new("lbl")).expect("create");
        log.failure("early event").expect("log failure");

        // Read back while the log is still open: incremental writes must
        // already be visible.
        let content = fs::read_to_string(&log_path).expect("read log");
        assert!(content.contains("✗ early event"));
        drop(log);
    }
}
