//! Conversion run reporting.

use std::fmt;

/// Aggregate counts from one conversion run.
///
/// `images`/`annotations`/`categories` are what landed in the output
/// document; the `skipped_*`/`dropped_*` counts cover inputs that were
/// recovered from rather than emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertReport {
    pub images: usize,
    pub annotations: usize,
    pub categories: usize,
    /// Images whose dimensions could not be read.
    pub skipped_images: usize,
    /// Label lines that failed structural parsing.
    pub skipped_lines: usize,
    /// Boxes dropped after clamping or category validation.
    pub dropped_boxes: usize,
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} image(s), {} annotation(s), {} category(ies)",
            self.images, self.annotations, self.categories
        )?;

        if self.skipped_images > 0 {
            writeln!(f, "  skipped {} unreadable image(s)", self.skipped_images)?;
        }
        if self.skipped_lines > 0 {
            writeln!(f, "  skipped {} malformed label line(s)", self.skipped_lines)?;
        }
        if self.dropped_boxes > 0 {
            writeln!(f, "  dropped {} box(es)", self.dropped_boxes)?;
        }

        Ok(())
    }
}
