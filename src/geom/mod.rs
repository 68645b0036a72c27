//! Geometry primitives for annotation transcoding.
//!
//! Bounding boxes carry a type-level coordinate-space marker so that
//! normalized (fraction-of-image) and pixel-space values cannot be mixed
//! by accident: a label-file box enters as `BBox<Normalized>` and must be
//! scaled through [`BBox::to_pixel`] before it can be clamped or emitted.

mod bbox;
mod space;

pub use bbox::{BBox, DegeneratePolicy};
pub use space::{Normalized, Pixel};
