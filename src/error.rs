use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yolovet operations.
///
/// Per-record problems (malformed label lines, out-of-range coordinates,
/// unreadable images) are never surfaced here: the pipelines recover from
/// them locally and report them through counts and logs. These variants
/// cover the conditions that genuinely abort a run: broken dataset layout,
/// unwritable outputs, bad CLI options.
#[derive(Debug, Error)]
pub enum YolovetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset layout at {path}: {message}")]
    LayoutInvalid { path: PathBuf, message: String },

    #[error("No image files found under {path}")]
    NoImagesFound { path: PathBuf },

    #[error("Failed to read dimensions of {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to parse {path}: {source}")]
    DataYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation found {error_count} error(s)")]
    ValidationFailed { error_count: usize },

    #[error("Invalid split parameters: {message}")]
    InvalidSplitParams { message: String },

    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),
}
