//! Coordinate space marker types.

/// Marker for absolute pixel coordinates, (0, 0) at the top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker for normalized coordinates, each value a fraction of the
/// corresponding image dimension.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}
