//! COCO detection-format document model and writer.
//!
//! Field layout follows the COCO data spec (<http://cocodataset.org/#format-data>)
//! restricted to object detection: every annotation carries an XYWH pixel
//! `bbox`, a precomputed `area`, `iscrowd = 0`, and an empty
//! `segmentation`. The whole document is held in memory and written once.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::YolovetError;

#[derive(Debug, Serialize, Deserialize)]
pub struct CocoDataset {
    pub info: CocoInfo,
    pub licenses: Vec<CocoLicense>,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CocoInfo {
    pub description: String,
    pub version: String,
    pub year: i32,
    pub contributor: String,
    pub date_created: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CocoLicense {
    pub id: u32,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
    pub license: u32,
    pub date_captured: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u32,
    /// `[x, y, width, height]`, `(x, y)` the top-left corner in pixels.
    pub bbox: [f64; 4],
    pub area: f64,
    pub iscrowd: u8,
    pub segmentation: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

impl CocoDataset {
    /// Creates an empty document with the fixed info and license blocks.
    pub fn new() -> Self {
        let now = chrono::Local::now();
        Self {
            info: CocoInfo {
                description: "COCO dataset converted from YOLO annotations".to_string(),
                version: "1.0".to_string(),
                year: now.year(),
                contributor: "yolovet".to_string(),
                date_created: now.format("%Y-%m-%d").to_string(),
            },
            licenses: vec![CocoLicense {
                id: 1,
                name: "Unknown License".to_string(),
                url: String::new(),
            }],
            images: Vec::new(),
            annotations: Vec::new(),
            categories: Vec::new(),
        }
    }
}

impl Default for CocoDataset {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the document as pretty-printed JSON, creating any missing parent
/// directories first.
pub fn write_coco_json(path: &Path, dataset: &CocoDataset) -> Result<(), YolovetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, dataset).map_err(|source| YolovetError::CocoJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes the document to a JSON string. Useful for tests.
pub fn to_coco_string(dataset: &CocoDataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dataset)
}
