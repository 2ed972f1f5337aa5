//! Remapping landmarks between image sub-windows.
//!
//! The trainer works with face rectangles of different sizes; a shape
//! annotated inside one rectangle is carried into another by expressing it in
//! the source rectangle's unit frame and reading that frame back out of the
//! destination rectangle. Each axis scales independently.

use crate::types::{BoundingBox, Point, Shape};

/// Map a single point from `original`'s coordinate frame into `new`'s.
///
/// The x and y axes are scaled independently. Rectangles with zero width or
/// height produce non-finite coordinates.
pub fn remap_point(original: &BoundingBox, p: Point, new: &BoundingBox) -> Point {
    new.from_unit(original.to_unit(p))
}

/// Map every landmark of `points` from `original`'s frame into `new`'s.
///
/// Points are not required to lie inside `original`.
pub fn remap(original: &BoundingBox, points: &Shape, new: &BoundingBox) -> Shape {
    points
        .iter()
        .map(|p| remap_point(original, *p, new))
        .collect()
}
