//! Dataset directory layout, file enumeration, and image probing.
//!
//! A YOLO-style dataset keeps images and label files in parallel trees:
//! either `images/` + `labels/` directly under the root, or one such pair
//! per `train`/`val`/`test` partition. A label file for `X.<ext>` lives at
//! the same relative stem `X.txt` in the labels tree.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::YolovetError;

/// Image extensions recognized during directory scans, case-insensitive.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Extension of label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Partition names probed when the root has no top-level `images/`.
const PARTITION_NAMES: [&str; 3] = ["train", "val", "test"];

/// One images/labels directory pair contributing to a run.
#[derive(Clone, Debug)]
pub struct Partition {
    /// Partition name (`train`, `val`, ...); `None` for a flat dataset.
    pub name: Option<String>,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

impl Partition {
    /// Location of the label file matching `image_path` (same relative
    /// stem, `.txt` extension). The file may or may not exist.
    pub fn label_path_for(&self, image_path: &Path) -> PathBuf {
        let rel = image_path
            .strip_prefix(&self.images_dir)
            .unwrap_or(image_path);
        self.labels_dir.join(rel).with_extension(LABEL_EXTENSION)
    }

    /// File name recorded in output for `image_path`: the path relative to
    /// the images directory, prefixed with the partition name if any.
    pub fn file_name_for(&self, image_path: &Path) -> String {
        let rel = rel_string(&self.images_dir, image_path);
        match &self.name {
            Some(name) => format!("{}/{}", name, rel),
            None => rel,
        }
    }
}

/// Discovers the partitions under a dataset root.
///
/// With `requested` names, each `<root>/<name>/images` must exist.
/// Otherwise `<root>/images` wins if present, and failing that any of
/// `train`/`val`/`test` that carry an `images/` directory.
pub fn discover_partitions(
    root: &Path,
    requested: &[String],
) -> Result<Vec<Partition>, YolovetError> {
    if !root.is_dir() {
        return Err(YolovetError::LayoutInvalid {
            path: root.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    if !requested.is_empty() {
        let mut partitions = Vec::with_capacity(requested.len());
        for name in requested {
            let base = root.join(name);
            let images_dir = base.join("images");
            if !images_dir.is_dir() {
                return Err(YolovetError::LayoutInvalid {
                    path: images_dir,
                    message: format!("partition '{}' has no images/ directory", name),
                });
            }
            partitions.push(Partition {
                name: Some(name.clone()),
                images_dir,
                labels_dir: base.join("labels"),
            });
        }
        return Ok(partitions);
    }

    if root.join("images").is_dir() {
        return Ok(vec![Partition {
            name: None,
            images_dir: root.join("images"),
            labels_dir: root.join("labels"),
        }]);
    }

    let partitions: Vec<Partition> = PARTITION_NAMES
        .iter()
        .filter(|name| root.join(name).join("images").is_dir())
        .map(|name| Partition {
            name: Some((*name).to_string()),
            images_dir: root.join(name).join("images"),
            labels_dir: root.join(name).join("labels"),
        })
        .collect();

    if partitions.is_empty() {
        return Err(YolovetError::LayoutInvalid {
            path: root.to_path_buf(),
            message: "expected an images/ directory or train/val/test partitions".to_string(),
        });
    }

    Ok(partitions)
}

/// Collects all image files under `dir`, sorted by relative path.
pub fn collect_image_files(dir: &Path) -> Result<Vec<PathBuf>, YolovetError> {
    collect_files_with_extensions(dir, &IMAGE_EXTENSIONS)
}

/// Collects all label files under `dir`, sorted by relative path.
pub fn collect_label_files(dir: &Path) -> Result<Vec<PathBuf>, YolovetError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    collect_files_with_extensions(dir, &[LABEL_EXTENSION])
}

fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, YolovetError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| YolovetError::LayoutInvalid {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_by_cached_key(|path| rel_string(root, path));
    Ok(files)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// Probes an image's pixel dimensions without decoding it.
///
/// Failures are per-image and recoverable: the converter skips the image,
/// it never aborts the run.
pub fn probe_image_dimensions(path: &Path) -> Result<(u32, u32), YolovetError> {
    let size = imagesize::size(path).map_err(|source| YolovetError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| YolovetError::LayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| YolovetError::LayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image height {} does not fit in u32", size.height),
        })?;

    Ok((width, height))
}

/// Path of `path` relative to `root`, with forward slashes.
pub fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
