//! Parsing and classification of YOLO label rows.
//!
//! A label file carries one detection per line, five whitespace-separated
//! fields: `class_id center_x center_y width height`, the class id a
//! non-negative integer and the geometry normalized to `[0, 1]`. The
//! functions here are pure; callers decide whether a failure is counted,
//! logged, or skipped.

use thiserror::Error;

use crate::geom::{BBox, Normalized};

/// One parsed detection in normalized center-form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRecord {
    pub class_id: u32,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl LabelRecord {
    /// Returns true if all four geometry fields lie in `[0, 1]`.
    pub fn geometry_in_unit_range(&self) -> bool {
        [self.cx, self.cy, self.w, self.h]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// The record's box in normalized coordinate space.
    pub fn bbox(&self) -> BBox<Normalized> {
        BBox::from_cxcywh(self.cx, self.cy, self.w, self.h)
    }
}

/// A structural failure: the line cannot be read as five numeric fields.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 5 whitespace-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("{field} '{token}' is not a valid number")]
    NonNumeric { field: &'static str, token: String },
}

/// The full classification of one label line.
///
/// Range failures keep the parsed record: the converter still transforms
/// out-of-range rows (clamping handles them), while the validator counts
/// them against the image.
#[derive(Clone, Debug, PartialEq)]
pub enum LineClass {
    Valid(LabelRecord),
    OutOfRange(LabelRecord),
    Malformed(ParseError),
}

/// Parses one label line into a [`LabelRecord`].
///
/// Rejects lines without exactly five fields and fields that do not parse
/// as numbers. Performs no range or semantic checks beyond that; a record
/// with `cx - w/2 < 0` parses fine.
pub fn parse_label_line(line: &str) -> Result<LabelRecord, ParseError> {
    // Take at most 6 tokens so pathological inputs do not allocate
    // unbounded memory.
    let tokens: Vec<&str> = line.split_whitespace().take(6).collect();

    if tokens.len() != 5 {
        return Err(ParseError::FieldCount {
            found: tokens.len(),
        });
    }

    let class_id = tokens[0]
        .parse::<u32>()
        .map_err(|_| ParseError::NonNumeric {
            field: "class_id",
            token: tokens[0].to_string(),
        })?;

    let cx = parse_geometry_token(tokens[1], "center_x")?;
    let cy = parse_geometry_token(tokens[2], "center_y")?;
    let w = parse_geometry_token(tokens[3], "width")?;
    let h = parse_geometry_token(tokens[4], "height")?;

    Ok(LabelRecord {
        class_id,
        cx,
        cy,
        w,
        h,
    })
}

/// Parses and range-checks one label line.
///
/// Structural failures are never reported as range failures: a line that
/// does not parse is `Malformed` even if some of its tokens happen to be
/// out-of-range numbers.
pub fn classify_label_line(line: &str) -> LineClass {
    match parse_label_line(line) {
        Ok(record) if record.geometry_in_unit_range() => LineClass::Valid(record),
        Ok(record) => LineClass::OutOfRange(record),
        Err(err) => LineClass::Malformed(err),
    }
}

fn parse_geometry_token(raw: &str, field: &'static str) -> Result<f64, ParseError> {
    raw.parse::<f64>().map_err(|_| ParseError::NonNumeric {
        field,
        token: raw.to_string(),
    })
}
