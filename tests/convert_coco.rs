//! End-to-end converter scenarios against on-disk fixture trees.

use std::fs;
use std::path::Path;

use yolovet::coco::CocoDataset;
use yolovet::convert::{convert_dataset, CategoryIdPolicy, ConvertOptions};
use yolovet::geom::DegeneratePolicy;

mod common;

fn read_output(path: &Path) -> CocoDataset {
    serde_json::from_str(&fs::read_to_string(path).expect("read output")).expect("parse output")
}

#[test]
fn document_carries_the_fixed_top_level_blocks() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/a.bmp"), 100, 100);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    fs::write(temp.path().join("labels/a.txt"), "0 0.5 0.5 0.2 0.2\n").expect("write label");

    let out = temp.path().join("dataset.json");
    convert_dataset(temp.path(), &out, &ConvertOptions::default()).expect("convert");

    let doc = read_output(&out);
    assert_eq!(doc.info.version, "1.0");
    assert_eq!(doc.licenses.len(), 1);
    assert_eq!(doc.licenses[0].id, 1);
    assert_eq!(doc.categories[0].supercategory, "none");
    assert_eq!(doc.images[0].license, 1);
    assert!(!doc.images[0].date_captured.is_empty());
}

#[test]
fn centered_box_on_a_hundred_square_lands_at_forty() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/a.bmp"), 100, 100);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    fs::write(temp.path().join("labels/a.txt"), "0 0.5 0.5 0.2 0.2\n").expect("write label");

    let out = temp.path().join("dataset.json");
    convert_dataset(temp.path(), &out, &ConvertOptions::default()).expect("convert");

    let doc = read_output(&out);
    assert_eq!(doc.annotations[0].bbox, [40.0, 40.0, 20.0, 20.0]);
    assert_eq!(doc.annotations[0].area, 400.0);
    assert_eq!(doc.annotations[0].iscrowd, 0);
    assert!(doc.annotations[0].segmentation.is_empty());
}

#[test]
fn every_emitted_box_lies_inside_its_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/a.bmp"), 64, 48);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    // A mix of in-range, slightly out-of-range, and wildly out-of-range
    // rows; all survive under the minimum-extent policy.
    fs::write(
        temp.path().join("labels/a.txt"),
        "0 0.5 0.5 0.2 0.2\n\
         0 1.05 0.5 0.2 0.2\n\
         0 0.0 0.0 0.1 0.1\n\
         1 1.5 1.5 3.0 3.0\n\
         1 0.5 0.5 0.0 0.0\n",
    )
    .expect("write label");

    let out = temp.path().join("dataset.json");
    let report = convert_dataset(temp.path(), &out, &ConvertOptions::default()).expect("convert");
    assert_eq!(report.annotations, 5);

    let doc = read_output(&out);
    for ann in &doc.annotations {
        let [x, y, w, h] = ann.bbox;
        assert!(x >= 0.0, "x_min must be non-negative: {:?}", ann.bbox);
        assert!(y >= 0.0, "y_min must be non-negative: {:?}", ann.bbox);
        assert!(x + w <= 64.0, "box exceeds width: {:?}", ann.bbox);
        assert!(y + h <= 48.0, "box exceeds height: {:?}", ann.bbox);
        assert!(w > 0.0 && h > 0.0, "extent must be positive: {:?}", ann.bbox);
        assert_eq!(ann.area, w * h);
    }
}

#[test]
fn names_file_orders_categories_by_line() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/a.bmp"), 32, 32);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    fs::write(temp.path().join("labels/a.txt"), "1 0.5 0.5 0.5 0.5\n").expect("write label");

    let names = temp.path().join("classes.txt");
    fs::write(&names, "person\ncar\ndog\n").expect("write names");

    let out = temp.path().join("dataset.json");
    let opts = ConvertOptions {
        names_file: Some(names),
        ..Default::default()
    };
    convert_dataset(temp.path(), &out, &opts).expect("convert");

    let doc = read_output(&out);
    let names: Vec<(u32, &str)> = doc
        .categories
        .iter()
        .map(|cat| (cat.id, cat.name.as_str()))
        .collect();
    assert_eq!(names, vec![(0, "person"), (1, "car"), (2, "dog")]);
    assert_eq!(doc.annotations[0].category_id, 1);
}

#[test]
fn inferred_categories_keep_observed_ids() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/a.bmp"), 32, 32);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    fs::write(
        temp.path().join("labels/a.txt"),
        "2 0.5 0.5 0.5 0.5\n0 0.25 0.25 0.1 0.1\n5 0.75 0.75 0.1 0.1\n",
    )
    .expect("write label");

    let out = temp.path().join("dataset.json");
    convert_dataset(temp.path(), &out, &ConvertOptions::default()).expect("convert");

    let doc = read_output(&out);
    let ids: Vec<u32> = doc.categories.iter().map(|cat| cat.id).collect();
    assert_eq!(ids, vec![0, 2, 5]);
    assert_eq!(doc.categories[1].name, "class_2");
}

#[test]
fn negative_images_appear_with_no_annotations() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/positive.bmp"), 32, 32);
    common::write_bmp(&temp.path().join("images/negative.bmp"), 32, 32);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    fs::write(
        temp.path().join("labels/positive.txt"),
        "0 0.5 0.5 0.5 0.5\n",
    )
    .expect("write label");

    let out = temp.path().join("dataset.json");
    let report = convert_dataset(temp.path(), &out, &ConvertOptions::default()).expect("convert");
    assert_eq!(report.images, 2);
    assert_eq!(report.annotations, 1);
    assert_eq!(report.skipped_images, 0);
    assert_eq!(report.skipped_lines, 0);

    let doc = read_output(&out);
    assert_eq!(doc.images.len(), 2);
    let negative = doc
        .images
        .iter()
        .find(|img| img.file_name == "negative.bmp")
        .expect("negative image present");
    assert!(doc
        .annotations
        .iter()
        .all(|ann| ann.image_id != negative.id));
}

#[test]
fn malformed_lines_are_skipped_without_failing_the_run() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/a.bmp"), 32, 32);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    fs::write(
        temp.path().join("labels/a.txt"),
        "garbage\n0 0.5 0.5 0.5 0.5\n0 0.1 0.1\n",
    )
    .expect("write label");

    let out = temp.path().join("dataset.json");
    let report = convert_dataset(temp.path(), &out, &ConvertOptions::default()).expect("convert");
    assert_eq!(report.annotations, 1);
    assert_eq!(report.skipped_lines, 2);
}

#[test]
fn strict_discard_mode_composes_with_remap() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_bmp(&temp.path().join("images/a.bmp"), 100, 100);
    fs::create_dir_all(temp.path().join("labels")).expect("create labels");
    fs::write(
        temp.path().join("labels/a.txt"),
        "0 0.5 0.5 0.2 0.2\n0 0.5 0.5 0.0 0.0\n7 0.5 0.5 0.2 0.2\n",
    )
    .expect("write label");
    let names = temp.path().join("classes.txt");
    fs::write(&names, "person\n").expect("write names");

    let out = temp.path().join("dataset.json");
    let opts = ConvertOptions {
        degenerate: DegeneratePolicy::DiscardDegenerate,
        category_ids: CategoryIdPolicy::Remap,
        names_file: Some(names),
        ..Default::default()
    };
    let report = convert_dataset(temp.path(), &out, &opts).expect("convert");

    assert_eq!(report.annotations, 1);
    assert_eq!(report.dropped_boxes, 2);
}
