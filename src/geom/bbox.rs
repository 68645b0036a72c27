//! Bounding boxes in corner-plus-extent (XYWH) form.

use std::fmt;
use std::marker::PhantomData;

use super::space::{Normalized, Pixel};

/// How to handle a box whose extent collapses while being clamped into the
/// image rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DegeneratePolicy {
    /// Force a minimum one-pixel extent and keep the box.
    ClampToMinimum,
    /// Clamp extents toward zero and drop the box if either collapses.
    DiscardDegenerate,
}

/// An axis-aligned bounding box as `(x, y, width, height)` with `(x, y)`
/// the top-left corner.
///
/// `TSpace` is either [`Pixel`] or [`Normalized`]. Construction does not
/// enforce positive extents or in-bounds corners: upstream detectors
/// routinely produce values slightly outside `[0, 1]` or degenerate boxes
/// at image borders, and those must be representable so that clamping and
/// validation can classify them instead of parsing refusing them.
#[derive(Clone, Copy, PartialEq)]
pub struct BBox<TSpace> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBox<TSpace> {
    /// Creates a box from its top-left corner and extents.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            _space: PhantomData,
        }
    }

    /// Creates a box from center-form `(cx, cy, w, h)`, the layout used by
    /// YOLO label rows.
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::from_xywh(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Returns the box in center-form `(cx, cy, w, h)`.
    #[inline]
    pub fn to_cxcywh(&self) -> (f64, f64, f64, f64) {
        (
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
            self.width,
            self.height,
        )
    }

    /// Area of the box. May be negative or zero for malformed boxes.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns true if all four values are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

impl<TSpace> fmt::Debug for BBox<TSpace> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BBox")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl BBox<Normalized> {
    /// Scales a normalized box into pixel space.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> BBox<Pixel> {
        BBox::from_xywh(
            self.x * image_width,
            self.y * image_height,
            self.width * image_width,
            self.height * image_height,
        )
    }
}

impl BBox<Pixel> {
    /// Clamps the box into an `image_width` × `image_height` rectangle.
    ///
    /// The corner is clamped to `[0, W-1]` × `[0, H-1]` (lower bound
    /// first), then the extents are clamped so the box cannot reach past
    /// the image edge. Under [`DegeneratePolicy::ClampToMinimum`] the
    /// extents are additionally floored at one pixel; under
    /// [`DegeneratePolicy::DiscardDegenerate`] a box whose extent is `<= 0`
    /// after clamping yields `None`.
    ///
    /// Clamping is idempotent: re-clamping a returned box is a no-op.
    pub fn clamp_to_image(
        &self,
        image_width: f64,
        image_height: f64,
        policy: DegeneratePolicy,
    ) -> Option<BBox<Pixel>> {
        let x = self.x.max(0.0).min(image_width - 1.0);
        let y = self.y.max(0.0).min(image_height - 1.0);

        let (width, height) = match policy {
            DegeneratePolicy::ClampToMinimum => (
                self.width.min(image_width - x).max(1.0),
                self.height.min(image_height - y).max(1.0),
            ),
            DegeneratePolicy::DiscardDegenerate => {
                let w = self.width.min(image_width - x).max(0.0);
                let h = self.height.min(image_height - y).max(0.0);
                if w <= 0.0 || h <= 0.0 {
                    return None;
                }
                (w, h)
            }
        };

        Some(Self::from_xywh(x, y, width, height))
    }
}
