//! Conversion of YOLO label trees into one aggregated COCO document.
//!
//! The converter never fails on a bad record: unreadable images are
//! skipped whole, malformed label lines and degenerate boxes are skipped
//! with a console warning, and a missing or empty label file is the
//! designed representation of a negative image, not an error. The only
//! fatal conditions are a broken dataset layout, an empty image set, and
//! an unwritable output.

mod report;

pub use report::ConvertReport;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classes::{resolve_classes, ClassMap};
use crate::coco::{write_coco_json, CocoAnnotation, CocoCategory, CocoDataset, CocoImage};
use crate::dataset::{collect_image_files, discover_partitions, probe_image_dimensions, Partition};
use crate::error::YolovetError;
use crate::geom::DegeneratePolicy;
use crate::label::{classify_label_line, LabelRecord, LineClass};

/// How category ids are assigned to emitted annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryIdPolicy {
    /// Pass the raw class index through. Class ids absent from the
    /// resolved category list are reported once per id but still emitted.
    TrustSource,
    /// Validate against the resolved category list; annotations whose
    /// class id is absent are dropped with a warning.
    Remap,
}

/// Options for one conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub degenerate: DegeneratePolicy,
    pub category_ids: CategoryIdPolicy,
    /// Explicit class names file; consulted before `data.yaml` and
    /// inference.
    pub names_file: Option<PathBuf>,
    /// Partition names to convert; empty means auto-discover.
    pub partitions: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            degenerate: DegeneratePolicy::ClampToMinimum,
            category_ids: CategoryIdPolicy::TrustSource,
            names_file: None,
            partitions: Vec::new(),
        }
    }
}

/// Converts every partition under `root` into one COCO JSON document at
/// `output`. Returns the aggregate counts.
pub fn convert_dataset(
    root: &Path,
    output: &Path,
    opts: &ConvertOptions,
) -> Result<ConvertReport, YolovetError> {
    let partitions = discover_partitions(root, &opts.partitions)?;
    let class_map = resolve_classes(opts.names_file.as_deref(), root, &partitions)?;
    if class_map.is_fallback() {
        eprintln!(
            "warning: no classes found in names file, data.yaml, or labels; using a generic two-class list"
        );
    }

    let partition_images: Vec<(Partition, Vec<PathBuf>)> = partitions
        .into_iter()
        .map(|partition| {
            let images = collect_image_files(&partition.images_dir)?;
            Ok((partition, images))
        })
        .collect::<Result<_, YolovetError>>()?;

    if partition_images.iter().all(|(_, images)| images.is_empty()) {
        return Err(YolovetError::NoImagesFound {
            path: root.to_path_buf(),
        });
    }

    let mut doc = CocoDataset::new();
    doc.categories = class_map
        .entries
        .iter()
        .map(|entry| CocoCategory {
            id: entry.id,
            name: entry.name.clone(),
            supercategory: "none".to_string(),
        })
        .collect();

    let mut report = ConvertReport {
        categories: doc.categories.len(),
        ..Default::default()
    };

    let date_captured = doc.info.date_created.clone();
    let mut image_id: u64 = 0;
    let mut annotation_id: u64 = 0;
    let mut warned_class_ids: HashSet<u32> = HashSet::new();

    for (partition, images) in &partition_images {
        for image_path in images {
            let (width, height) = match probe_image_dimensions(image_path) {
                Ok(dims) => dims,
                Err(err) => {
                    eprintln!(
                        "warning: skipping unreadable image {}: {}",
                        image_path.display(),
                        err
                    );
                    report.skipped_images += 1;
                    continue;
                }
            };

            image_id += 1;
            doc.images.push(CocoImage {
                id: image_id,
                width,
                height,
                file_name: partition.file_name_for(image_path),
                license: 1,
                date_captured: date_captured.clone(),
            });
            report.images += 1;

            let label_path = partition.label_path_for(image_path);
            if !has_content(&label_path) {
                // Negative image: present in `images`, no annotations.
                continue;
            }

            let content = fs::read_to_string(&label_path)?;
            for (idx, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }

                let record = match classify_label_line(line) {
                    LineClass::Valid(record) | LineClass::OutOfRange(record) => record,
                    LineClass::Malformed(err) => {
                        eprintln!(
                            "warning: {}:{}: {}; line skipped",
                            label_path.display(),
                            idx + 1,
                            err
                        );
                        report.skipped_lines += 1;
                        continue;
                    }
                };

                let Some(category_id) = resolve_category_id(
                    &record,
                    &class_map,
                    opts.category_ids,
                    &mut warned_class_ids,
                ) else {
                    eprintln!(
                        "warning: {}:{}: class id {} not in the category list; line skipped",
                        label_path.display(),
                        idx + 1,
                        record.class_id
                    );
                    report.dropped_boxes += 1;
                    continue;
                };

                let bbox = record.bbox().to_pixel(width as f64, height as f64);
                let Some(clamped) = bbox.clamp_to_image(width as f64, height as f64, opts.degenerate)
                else {
                    eprintln!(
                        "warning: {}:{}: box collapsed to zero extent; line skipped",
                        label_path.display(),
                        idx + 1
                    );
                    report.dropped_boxes += 1;
                    continue;
                };

                annotation_id += 1;
                doc.annotations.push(CocoAnnotation {
                    id: annotation_id,
                    image_id,
                    category_id,
                    bbox: [clamped.x, clamped.y, clamped.width, clamped.height],
                    area: clamped.area(),
                    iscrowd: 0,
                    segmentation: Vec::new(),
                });
                report.annotations += 1;
            }
        }
    }

    write_coco_json(output, &doc)?;
    Ok(report)
}

/// A label file counts only when it exists and is non-empty; both absence
/// and a zero-length file mean "negative image".
fn has_content(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.len() > 0).unwrap_or(false)
}

/// Applies the category id policy. `None` means the annotation must be
/// dropped; under `TrustSource` unknown ids are reported once but kept.
fn resolve_category_id(
    record: &LabelRecord,
    class_map: &ClassMap,
    policy: CategoryIdPolicy,
    warned: &mut HashSet<u32>,
) -> Option<u32> {
    if class_map.contains(record.class_id) {
        return Some(record.class_id);
    }

    match policy {
        CategoryIdPolicy::TrustSource => {
            if warned.insert(record.class_id) {
                eprintln!(
                    "warning: class id {} is not in the category list; emitting it anyway",
                    record.class_id
                );
            }
            Some(record.class_id)
        }
        CategoryIdPolicy::Remap => None,
    }
}
