//! Category resolution for conversion output.
//!
//! The category list comes from the first available source: an explicit
//! names file (one class per non-empty line, id = line index), a
//! `data.yaml` in the dataset root (Ultralytics convention, `names:` as a
//! sequence or an index-to-name mapping), or inference from the class ids
//! observed across all label files. A dataset with no observable classes
//! at all falls back to a fixed two-class list so the output never carries
//! an empty category table.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dataset::{collect_label_files, Partition};
use crate::error::YolovetError;

/// One resolved category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassEntry {
    pub id: u32,
    pub name: String,
}

/// Where a class map came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassMapSource {
    NamesFile(PathBuf),
    DataYaml(PathBuf),
    Inferred,
    Fallback,
}

/// The ordered category list for an output dataset. Never empty.
#[derive(Clone, Debug)]
pub struct ClassMap {
    pub entries: Vec<ClassEntry>,
    pub source: ClassMapSource,
}

impl ClassMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `class_id` appears in the resolved list.
    pub fn contains(&self, class_id: u32) -> bool {
        self.entries.iter().any(|entry| entry.id == class_id)
    }

    /// Returns true if the fixed fallback list was substituted.
    pub fn is_fallback(&self) -> bool {
        self.source == ClassMapSource::Fallback
    }
}

/// Resolves the category list for a dataset.
///
/// `names_file` wins when supplied and existing; a `data.yaml` under
/// `root` is consulted next; otherwise class ids are inferred from the
/// label files of all `partitions`.
pub fn resolve_classes(
    names_file: Option<&Path>,
    root: &Path,
    partitions: &[Partition],
) -> Result<ClassMap, YolovetError> {
    if let Some(path) = names_file {
        if path.is_file() {
            let entries = read_names_file(path)?;
            if !entries.is_empty() {
                return Ok(ClassMap {
                    entries,
                    source: ClassMapSource::NamesFile(path.to_path_buf()),
                });
            }
        }
    }

    let data_yaml = root.join("data.yaml");
    if data_yaml.is_file() {
        let entries = read_data_yaml(&data_yaml)?;
        if !entries.is_empty() {
            return Ok(ClassMap {
                entries,
                source: ClassMapSource::DataYaml(data_yaml),
            });
        }
    }

    let entries = infer_from_labels(partitions)?;
    if !entries.is_empty() {
        return Ok(ClassMap {
            entries,
            source: ClassMapSource::Inferred,
        });
    }

    // A dataset with zero categories is unusable downstream; substitute a
    // fixed pair and let the caller warn.
    Ok(ClassMap {
        entries: vec![
            ClassEntry {
                id: 0,
                name: "class_0".to_string(),
            },
            ClassEntry {
                id: 1,
                name: "class_1".to_string(),
            },
        ],
        source: ClassMapSource::Fallback,
    })
}

fn read_names_file(path: &Path) -> Result<Vec<ClassEntry>, YolovetError> {
    let data = fs::read_to_string(path)?;

    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, name)| ClassEntry {
            id: index as u32,
            name: name.to_string(),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<u32, String>),
}

fn read_data_yaml(path: &Path) -> Result<Vec<ClassEntry>, YolovetError> {
    let data = fs::read_to_string(path)?;
    let parsed: DataYaml =
        serde_yaml::from_str(&data).map_err(|source| YolovetError::DataYamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    let entries = match parsed.names {
        DataYamlNames::Sequence(names) => names
            .into_iter()
            .enumerate()
            .map(|(index, name)| ClassEntry {
                id: index as u32,
                name,
            })
            .collect(),
        DataYamlNames::Mapping(mapping) => mapping
            .into_iter()
            .map(|(id, name)| ClassEntry {
                id,
                name: if name.trim().is_empty() {
                    format!("class_{}", id)
                } else {
                    name
                },
            })
            .collect(),
    };

    Ok(entries)
}

/// Scans every label file and collects the distinct leading class ids.
///
/// Only the first token of each line matters here; lines that are
/// malformed past the class id still contribute it, and lines whose first
/// token is not a non-negative integer are ignored.
fn infer_from_labels(partitions: &[Partition]) -> Result<Vec<ClassEntry>, YolovetError> {
    let mut class_ids: BTreeSet<u32> = BTreeSet::new();

    for partition in partitions {
        for label_path in collect_label_files(&partition.labels_dir)? {
            let content = fs::read_to_string(&label_path)?;
            for line in content.lines() {
                if let Some(token) = line.split_whitespace().next() {
                    if let Ok(id) = token.parse::<u32>() {
                        class_ids.insert(id);
                    }
                }
            }
        }
    }

    Ok(class_ids
        .into_iter()
        .map(|id| ClassEntry {
            id,
            name: format!("class_{}", id),
        })
        .collect())
}
